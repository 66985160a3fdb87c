use crate::models::AnonymizedContext;

pub const CONSULTATION_TYPE_WEIGHT: f64 = 3.0;
pub const GESTATIONAL_WEEKS_WEIGHT: f64 = 2.0;
pub const AGE_GROUP_WEIGHT: f64 = 1.0;
pub const PARITY_WEIGHT: f64 = 1.0;
pub const TRIMESTER_WEIGHT: f64 = 1.0;

/// Weighted feature agreement between two contexts, in `[0, 1]`.
///
/// | feature | weight | counted when | awarded |
/// |---|---|---|---|
/// | consultation type | 3 | present on either side | equal |
/// | gestational weeks | 2 | present on both | full if |Δ| ≤ 2, half if |Δ| ≤ 4 |
/// | age group, parity, trimester | 1 each | present on both | equal |
///
/// Awarded weight over counted weight; 0 when nothing is counted. Both
/// contexts are compared in canonical form, so the score is symmetric.
pub fn similarity(a: &AnonymizedContext, b: &AnonymizedContext) -> f64 {
    let a = a.canonical();
    let b = b.canonical();

    let mut awarded = 0.0;
    let mut applicable = 0.0;

    if a.consultation_type.is_some() || b.consultation_type.is_some() {
        applicable += CONSULTATION_TYPE_WEIGHT;
        if a.consultation_type == b.consultation_type {
            awarded += CONSULTATION_TYPE_WEIGHT;
        }
    }

    if let (Some(wa), Some(wb)) = (a.gestational_weeks, b.gestational_weeks) {
        applicable += GESTATIONAL_WEEKS_WEIGHT;
        let delta = wa.abs_diff(wb);
        if delta <= 2 {
            awarded += GESTATIONAL_WEEKS_WEIGHT;
        } else if delta <= 4 {
            awarded += GESTATIONAL_WEEKS_WEIGHT / 2.0;
        }
    }

    awarded_if_both(&a.age_group, &b.age_group, AGE_GROUP_WEIGHT, &mut awarded, &mut applicable);
    awarded_if_both(&a.parity, &b.parity, PARITY_WEIGHT, &mut awarded, &mut applicable);
    awarded_if_both(&a.trimester, &b.trimester, TRIMESTER_WEIGHT, &mut awarded, &mut applicable);

    if applicable == 0.0 {
        0.0
    } else {
        awarded / applicable
    }
}

fn awarded_if_both<T: PartialEq>(
    a: &Option<T>,
    b: &Option<T>,
    weight: f64,
    awarded: &mut f64,
    applicable: &mut f64,
) {
    if let (Some(x), Some(y)) = (a, b) {
        *applicable += weight;
        if x == y {
            *awarded += weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trimester;

    fn ctx(consultation: Option<&str>, weeks: Option<u32>) -> AnonymizedContext {
        AnonymizedContext {
            consultation_type: consultation.map(String::from),
            gestational_weeks: weeks,
            ..Default::default()
        }
    }

    #[test]
    fn two_weeks_apart_is_full_match() {
        let a = ctx(Some("prenatale"), Some(24));
        let b = ctx(Some("prenatale"), Some(26));
        assert_eq!(similarity(&a, &b), 1.0);
    }

    #[test]
    fn four_weeks_apart_is_half_credit() {
        let a = ctx(Some("prenatale"), Some(24));
        let b = ctx(Some("prenatale"), Some(28));
        assert_eq!(similarity(&a, &b), 4.0 / 5.0);
        let far = ctx(Some("prenatale"), Some(29));
        assert_eq!(similarity(&a, &far), 3.0 / 5.0);
    }

    #[test]
    fn consultation_type_counts_when_one_side_missing() {
        let a = ctx(Some("prenatale"), Some(24));
        let b = ctx(None, Some(24));
        assert_eq!(similarity(&a, &b), 2.0 / 5.0);
        assert_eq!(similarity(&b, &a), 2.0 / 5.0);
    }

    #[test]
    fn nothing_applicable_scores_zero() {
        let empty = AnonymizedContext::default();
        assert_eq!(similarity(&empty, &empty), 0.0);
        let only_weeks = ctx(None, Some(12));
        assert_eq!(similarity(&empty, &only_weeks), 0.0);
    }

    #[test]
    fn optional_features_only_when_both_present() {
        let mut a = ctx(Some("prenatale"), None);
        a.parity = Some(1);
        a.trimester = Some(Trimester::Second);
        let mut b = ctx(Some("prenatale"), None);
        b.parity = Some(2);
        // parity counted (1 of 2 max), trimester ignored
        assert_eq!(similarity(&a, &b), 3.0 / 4.0);
        b.age_group = Some("25-34".into());
        assert_eq!(similarity(&a, &b), 3.0 / 4.0);
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        let a = ctx(Some("prenatale "), None);
        let b = ctx(Some("prenatale"), None);
        assert_eq!(similarity(&a, &b), 1.0);
    }

    #[test]
    fn consultation_type_compared_exactly() {
        let a = ctx(Some("Prenatale"), Some(24));
        let b = ctx(Some("prenatale"), Some(24));
        // weeks awarded (2), consultation type counted but not awarded (3)
        assert_eq!(similarity(&a, &b), 2.0 / 5.0);
    }

    #[test]
    fn symmetric_and_bounded_over_a_grid() {
        let types = [None, Some("prenatale"), Some("postnatale")];
        let weeks = [None, Some(10), Some(12), Some(14), Some(20)];
        let parities = [None, Some(0), Some(2)];
        let mut contexts = Vec::new();
        for t in types {
            for w in weeks {
                for p in parities {
                    let mut c = ctx(t, w);
                    c.parity = p;
                    contexts.push(c);
                }
            }
        }
        for a in &contexts {
            for b in &contexts {
                let ab = similarity(a, b);
                assert_eq!(ab, similarity(b, a));
                assert!((0.0..=1.0).contains(&ab));
            }
        }
    }
}
