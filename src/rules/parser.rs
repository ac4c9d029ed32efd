use log::{debug, trace};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::{Mode, RuleTable};
use crate::error::RulesError;

const DNSMASQ_TAG: &str = "address=";

/// Load a rule file, a missing or unreadable file yields an empty table
pub fn load_file(mode: Mode, path: &Path) -> Result<RuleTable, RulesError> {
    if !path.is_file() {
        debug!("rule file not exists: {:?}", path);
        return Ok(RuleTable::new(mode));
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!("rule file not readable: {:?}, {}", path, e);
            return Ok(RuleTable::new(mode));
        }
    };

    debug!("load {} file: {:?}", mode, path);
    parse(mode, BufReader::new(file))
}

pub fn parse<R: BufRead>(mode: Mode, reader: R) -> Result<RuleTable, RulesError> {
    match mode {
        Mode::Hosts => parse_hosts(reader),
        Mode::Dnsmasq => parse_dnsmasq(reader),
    }
}

/// `address hostname` per line
pub fn parse_hosts<R: BufRead>(reader: R) -> Result<RuleTable, RulesError> {
    let mut table = RuleTable::new(Mode::Hosts);

    for (n, line) in lossy_lines(reader).enumerate() {
        let line = line?;
        if skip(&line) {
            continue;
        }

        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(addr), Some(hostname)) => {
                trace!("put {} {}", hostname, addr);
                table.insert(hostname, addr);
            }
            _ => {
                return Err(RulesError::MalformedLine {
                    line: n + 1,
                    content: line,
                })
            }
        }
    }

    Ok(table)
}

/// `address=/hostname/address` per line, other lines are ignored
pub fn parse_dnsmasq<R: BufRead>(reader: R) -> Result<RuleTable, RulesError> {
    let mut table = RuleTable::new(Mode::Dnsmasq);

    for line in lossy_lines(reader) {
        let line = line?;
        if skip(&line) {
            continue;
        }

        let mut fields = line.split('/').collect::<Vec<_>>();
        while fields.last().is_some_and(|v| v.is_empty()) {
            fields.pop();
        }

        if fields.len() != 3 || fields[0] != DNSMASQ_TAG {
            continue;
        }

        let hostname = fields[1].strip_prefix('.').unwrap_or(fields[1]);
        trace!("put {} {}", hostname, fields[2]);
        table.insert(hostname, fields[2]);
    }

    Ok(table)
}

/// Lines decoded with replacement characters, only read failures are errors
struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> {
    LossyLines {
        reader,
        buf: Vec::new(),
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

fn skip(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty() || line.starts_with('#')
}
