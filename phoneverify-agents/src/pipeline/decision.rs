use shared_types::LineType;

/// Cost of one presence-check API call, in dollars
pub const PRESENCE_CHECK_COST: f64 = 0.012;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingDecision {
    pub skip_presence_check: bool,
    pub cost_saved: f64,
}

/// Landlines rarely carry messaging accounts, so the paid check is skipped
pub fn decide(line_type: LineType) -> RoutingDecision {
    match line_type {
        LineType::Landline => RoutingDecision {
            skip_presence_check: true,
            cost_saved: PRESENCE_CHECK_COST,
        },
        LineType::Mobile | LineType::Voip => RoutingDecision {
            skip_presence_check: false,
            cost_saved: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landline_skips() {
        let decision = decide(LineType::Landline);
        assert!(decision.skip_presence_check);
        assert_eq!(decision.cost_saved, 0.012);
    }

    #[test]
    fn test_mobile_and_voip_proceed() {
        for line_type in [LineType::Mobile, LineType::Voip] {
            let decision = decide(line_type);
            assert!(!decision.skip_presence_check);
            assert_eq!(decision.cost_saved, 0.0);
        }
    }
}
