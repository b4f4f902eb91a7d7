use chrono::{DateTime, Utc};

use crate::config::BranchNaming;

/// Produces working-branch names for a run.
#[derive(Debug, Clone)]
pub struct BranchNamer {
    prefix: String,
    naming: BranchNaming,
}

impl BranchNamer {
    pub fn new(prefix: &str, naming: BranchNaming) -> Self {
        Self {
            prefix: prefix.to_string(),
            naming,
        }
    }

    pub fn name_at(&self, now: DateTime<Utc>) -> String {
        match self.naming {
            BranchNaming::Fixed => self.prefix.clone(),
            BranchNaming::Timestamp => format!("{}-{}", self.prefix, now.format("%Y%m%d%H%M%S")),
        }
    }

    pub fn next(&self) -> String {
        self.name_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_suffix() {
        let namer = BranchNamer::new("config-rollout", BranchNaming::Timestamp);
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(namer.name_at(at), "config-rollout-20240309070501");
    }

    #[test]
    fn test_fixed_name_is_stable() {
        let namer = BranchNamer::new("ops/config", BranchNaming::Fixed);
        assert_eq!(namer.next(), "ops/config");
        assert_eq!(namer.next(), namer.next());
    }
}
