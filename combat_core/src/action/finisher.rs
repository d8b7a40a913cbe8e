//! Finisher scaling - Rebuilding a scaled copy of an inner action

use super::{Action, ActionKind};

/// Multiplier for a given focus value, read from a percent scale table.
///
/// Focus is clamped into the table's 0 - 3 range.
pub fn focus_scale(scale_table: &[u32; 4], focus: f64) -> f64 {
    let index = (focus.max(0.0).floor() as usize).min(scale_table.len() - 1);
    scale_table[index] as f64 / 100.0
}

impl Action {
    /// Build a transient copy of this action scaled by `scale`.
    ///
    /// Only weapon attacks (multiplier) and summons (count) scale today;
    /// other kinds return `None` and resolve unscaled.
    pub fn scaled_by(&self, scale: f64) -> Option<Action> {
        let kind = match &self.kind {
            ActionKind::WeaponAttack { multiplier } => ActionKind::WeaponAttack {
                multiplier: multiplier * scale,
            },
            ActionKind::Summon {
                count,
                summon_kind,
                duration,
            } => ActionKind::Summon {
                count: (*count as f64 * scale).round().max(0.0) as u32,
                summon_kind: summon_kind.clone(),
                duration: *duration,
            },
            _ => return None,
        };

        Some(Action {
            kind,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionType;

    #[test]
    fn test_focus_scale_lookup() {
        let table = [50, 100, 150, 200];
        assert!((focus_scale(&table, 0.0) - 0.5).abs() < f64::EPSILON);
        assert!((focus_scale(&table, 2.0) - 1.5).abs() < f64::EPSILON);
        assert!((focus_scale(&table, 3.0) - 2.0).abs() < f64::EPSILON);
        // Out of range clamps
        assert!((focus_scale(&table, 7.0) - 2.0).abs() < f64::EPSILON);
        assert!((focus_scale(&table, -1.0) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scaled_weapon_attack() {
        let slash = Action::new("slash", ActionType::Melee, ActionKind::WeaponAttack { multiplier: 1.0 });
        let scaled = slash.scaled_by(1.5).unwrap();
        assert_eq!(scaled.kind, ActionKind::WeaponAttack { multiplier: 1.5 });
        assert_eq!(scaled.name, "slash");
    }

    #[test]
    fn test_scaled_summon_rounds_count() {
        let summon = Action::new(
            "call_wolves",
            ActionType::Utility,
            ActionKind::Summon {
                count: 2,
                summon_kind: "wolf".to_string(),
                duration: 3,
            },
        );
        match summon.scaled_by(1.5).unwrap().kind {
            ActionKind::Summon { count, .. } => assert_eq!(count, 3),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_unscalable_kind() {
        let heal = Action::new("mend", ActionType::Heal, ActionKind::Heal { base_quantity: 10.0 });
        assert!(heal.scaled_by(2.0).is_none());
    }
}
