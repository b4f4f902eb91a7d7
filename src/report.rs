use std::fmt::Write as _;

use crate::workflow::ProposalRecord;

/// End-of-run summary: the count followed by one URL per line.
pub fn summary(proposals: &[ProposalRecord]) -> String {
    let mut out = format!("{} Pull Request(s) created.", proposals.len());
    for record in proposals {
        let _ = write!(out, "\n{}", record.url);
    }
    out
}

pub fn print(proposals: &[ProposalRecord]) {
    println!("{}", summary(proposals));
}
