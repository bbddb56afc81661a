//! UI domain: tests for the attempt summary text.

use super::*;
use crate::blood::BloodBand;

#[test]
fn test_summary_lines() {
    let summary = AttemptSummary {
        attempt: 3,
        enemies_defeated: 5,
        objectives_done: 2,
        objectives_total: 4,
        final_band: BloodBand::Severe,
    };

    assert_eq!(
        summary.lines(),
        vec![
            "Attempt 3".to_string(),
            "Enemies defeated: 5".to_string(),
            "Objectives: 2/4".to_string(),
            "Blood: Severe withdrawal".to_string(),
        ]
    );
}
