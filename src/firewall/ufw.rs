//! UFW backend: one rule per block.

use super::{Action, FirewallBackend, FwCommand};
use crate::{CidrBlock, IpVersion};

/// Issues `ufw <action> from <cidr>` for every block.
#[derive(Debug, Clone, Copy, Default)]
pub struct UfwBackend;

impl FirewallBackend for UfwBackend {
    fn name(&self) -> &'static str {
        "ufw"
    }

    fn required_programs(&self, _version: IpVersion) -> &'static [&'static str] {
        &["ufw"]
    }

    fn plan(
        &self,
        action: Action,
        _country: &str,
        _version: IpVersion,
        blocks: &[CidrBlock],
    ) -> Vec<FwCommand> {
        blocks
            .iter()
            .map(|block| {
                FwCommand::new(
                    "ufw",
                    [action.as_str().to_string(), "from".to_string(), block.to_string()],
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_one_rule_per_block() {
        let blocks: Vec<CidrBlock> = vec![
            "203.0.113.0/24".parse().unwrap(),
            "198.51.100.0/24".parse().unwrap(),
        ];
        let plan = UfwBackend.plan(Action::Reject, "NL", IpVersion::V4, &blocks);
        let text: Vec<String> = plan.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            text,
            vec!["ufw reject from 203.0.113.0/24", "ufw reject from 198.51.100.0/24"]
        );
    }

    #[test]
    fn test_plan_empty() {
        assert!(UfwBackend.plan(Action::Allow, "NL", IpVersion::V6, &[]).is_empty());
    }
}
