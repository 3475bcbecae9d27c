use std::collections::HashSet;
use std::io::BufRead;
use thiserror::Error;

/// One client record from the input file. Immutable for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Client {
    pub id: u32,
    /// Minutes after simulation start at which the client first arrives.
    pub arrival_minutes: u64,
    /// Simulated minutes of service this client needs.
    pub service_minutes: u64,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line_no}: {reason}")]
    MalformedRecord { line_no: usize, reason: String },
    #[error("line {line_no}: duplicate client id {id}")]
    DuplicateId { line_no: usize, id: u32 },
}

/// Parse client records, one per line: `id arrival_minutes service_minutes`,
/// whitespace separated. Blank lines are skipped. Any malformed line is a
/// fatal configuration error.
pub fn parse_clients<R: BufRead>(reader: R) -> Result<Vec<Client>, InputError> {
    let mut clients = Vec::new();
    let mut seen_ids = HashSet::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let id_raw = next_field(&mut fields, line_no, "id")?;
        let id = u32::try_from(id_raw).map_err(|_| InputError::MalformedRecord {
            line_no,
            reason: format!("client id {} out of range", id_raw),
        })?;
        let arrival_minutes = next_field(&mut fields, line_no, "arrival time")?;
        let service_minutes = next_field(&mut fields, line_no, "service time")?;
        if let Some(extra) = fields.next() {
            return Err(InputError::MalformedRecord {
                line_no,
                reason: format!("unexpected trailing field {:?}", extra),
            });
        }

        if !seen_ids.insert(id) {
            return Err(InputError::DuplicateId { line_no, id });
        }

        clients.push(Client {
            id,
            arrival_minutes,
            service_minutes,
        });
    }

    Ok(clients)
}

fn next_field<'a, I: Iterator<Item = &'a str>>(
    fields: &mut I,
    line_no: usize,
    what: &str,
) -> Result<u64, InputError> {
    let raw = fields.next().ok_or_else(|| InputError::MalformedRecord {
        line_no,
        reason: format!("missing {}", what),
    })?;
    raw.parse().map_err(|_| InputError::MalformedRecord {
        line_no,
        reason: format!("{} is not a non-negative integer: {:?}", what, raw),
    })
}
