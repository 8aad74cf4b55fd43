use crate::*;

fn item(address: &str, resource_type: &str, action: ActionKind) -> ResourceItem {
    ResourceItem {
        address: address.to_string(),
        resource_type: resource_type.to_string(),
        name: address.to_string(),
        action,
        before: None,
        after: None,
        deps: Vec::new(),
    }
}

#[test]
fn single_instance_create_scores_six() {
    let out = score(
        &[item("aws_instance.web", "aws_instance", ActionKind::Create)],
        &RiskConfig::default(),
    );
    assert_eq!(out.score, 6);
    assert_eq!(out.level, RiskLevel::Low);
    assert!(out.flagged_items.is_empty());
}

#[test]
fn database_deletion_is_critical_and_scores_full() {
    let out = score(
        &[item("aws_db_instance.db", "aws_db_instance", ActionKind::Delete)],
        &RiskConfig::default(),
    );
    assert_eq!(out.score, 100);
    assert_eq!(out.level, RiskLevel::High);
    assert_eq!(
        out.flagged_items,
        vec![FlaggedItem {
            address: "aws_db_instance.db".to_string(),
            resource_type: "aws_db_instance".to_string(),
            reason: FlagReason::CriticalDeletion,
        }]
    );
}

#[test]
fn empty_change_set_scores_zero() {
    let out = score::<ResourceItem>(&[], &RiskConfig::default());
    assert_eq!(out, RiskAssessment::empty());
}

#[test]
fn no_op_items_are_excluded_from_scoring() {
    let cfg = RiskConfig::default();
    let only_noop = score(&[item("aws_vpc.main", "aws_vpc", ActionKind::NoOp)], &cfg);
    assert_eq!(only_noop.score, 0);

    let mixed = score(
        &[
            item("aws_vpc.main", "aws_vpc", ActionKind::NoOp),
            item("aws_instance.web", "aws_instance", ActionKind::Create),
        ],
        &cfg,
    );
    assert_eq!(mixed.score, 6);
}

#[test]
fn normalization_uses_global_maxima() {
    // (2×3 + 1×1) over 2 × 50: a bucket update plus a create of an unweighted type.
    let out = score(
        &[
            item("aws_s3_bucket.logs", "aws_s3_bucket", ActionKind::Update),
            item("null_resource.x", "null_resource", ActionKind::Create),
        ],
        &RiskConfig::default(),
    );
    assert_eq!(out.score, 7);
    assert_eq!(out.level, RiskLevel::Low);
}

#[test]
fn level_thresholds() {
    assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(40), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(69), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
}

#[test]
fn flag_reasons_follow_precedence() {
    let cfg = RiskConfig::default();
    let flagged = score(
        &[
            // replace of a weight-5 type: the delete half makes it critical
            item("aws_vpc.main", "aws_vpc", ActionKind::Replace),
            // replace of a light type
            item("aws_s3_bucket.b", "aws_s3_bucket", ActionKind::Replace),
            // security group update
            item("aws_security_group.sg", "aws_security_group", ActionKind::Update),
            // iam role delete is critical (weight 4) before it is security-sensitive
            item("aws_iam_role.r", "aws_iam_role", ActionKind::Delete),
            // unknown iam type deleted: weight 1, so only security-sensitive
            item("aws_iam_user_policy.p", "aws_iam_user_policy", ActionKind::Delete),
            // security creates are not flagged
            item("aws_iam_policy.new", "aws_iam_policy", ActionKind::Create),
        ],
        &cfg,
    )
    .flagged_items;

    let got: Vec<(&str, FlagReason)> = flagged
        .iter()
        .map(|f| (f.address.as_str(), f.reason))
        .collect();
    assert_eq!(
        got,
        vec![
            ("aws_vpc.main", FlagReason::CriticalDeletion),
            ("aws_s3_bucket.b", FlagReason::Replacement),
            ("aws_security_group.sg", FlagReason::SecuritySensitive),
            ("aws_iam_role.r", FlagReason::CriticalDeletion),
            ("aws_iam_user_policy.p", FlagReason::SecuritySensitive),
        ]
    );
}

#[test]
fn flag_reason_serializes_as_message() {
    let v = serde_json::to_value(FlagReason::Replacement).unwrap();
    assert_eq!(v, serde_json::json!("Resource will be replaced (recreated)"));
}

#[test]
fn huge_configured_weight_does_not_overflow() {
    let mut config = RiskConfig::default();
    config
        .type_weights
        .insert("aws_vpc".to_string(), 4_000_000_000);
    let out = score(
        &[
            item("aws_vpc.main", "aws_vpc", ActionKind::Delete),
            item("aws_instance.web", "aws_instance", ActionKind::Create),
        ],
        &config,
    );
    // (4e9 × 10 + 3) over 2 × 4e9 × 10
    assert_eq!(out.score, 50);
    assert_eq!(out.level, RiskLevel::Medium);
}
