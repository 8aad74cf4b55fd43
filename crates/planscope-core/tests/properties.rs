use planscope_core::{
    ActionKind, PlanEnvelope, ResourceItem, RiskConfig, RiskLevel, classify, normalize, score,
};
use proptest::prelude::*;
use serde_json::json;

fn action_tag() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["create", "delete", "update", "no-op", "read"]).prop_map(String::from)
}

fn change_action() -> impl Strategy<Value = ActionKind> {
    prop::sample::select(vec![
        ActionKind::Create,
        ActionKind::Update,
        ActionKind::Delete,
        ActionKind::Replace,
        ActionKind::NoOp,
    ])
}

fn resource_type() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "aws_instance",
        "aws_db_instance",
        "aws_s3_bucket",
        "aws_security_group",
        "aws_iam_role",
        "aws_vpc",
        "null_resource",
        "azurerm_storage_account",
    ])
    .prop_map(String::from)
}

fn item(idx: usize, resource_type: String, action: ActionKind) -> ResourceItem {
    ResourceItem {
        address: format!("{resource_type}.r{idx}"),
        name: format!("r{idx}"),
        resource_type,
        action,
        before: None,
        after: None,
        deps: Vec::new(),
    }
}

fn items() -> impl Strategy<Value = Vec<ResourceItem>> {
    prop::collection::vec((resource_type(), change_action()), 0..24).prop_map(|v| {
        v.into_iter()
            .enumerate()
            .map(|(i, (t, a))| item(i, t, a))
            .collect()
    })
}

proptest! {
    #[test]
    fn create_and_delete_always_classify_as_replace(
        mut extra in prop::collection::vec(action_tag(), 0..6),
        create_at in 0usize..8,
        delete_at in 0usize..8,
    ) {
        extra.insert(create_at.min(extra.len()), "create".to_string());
        extra.insert(delete_at.min(extra.len()), "delete".to_string());
        prop_assert_eq!(classify(&extra), ActionKind::Replace);
    }

    #[test]
    fn counts_sum_to_changed_items(
        changes in prop::collection::vec(prop::collection::vec(action_tag(), 0..4), 0..20)
    ) {
        let resource_changes: Vec<_> = changes
            .iter()
            .enumerate()
            .map(|(i, actions)| json!({
                "address": format!("aws_instance.r{i}"),
                "type": "aws_instance",
                "name": format!("r{i}"),
                "change": { "actions": actions }
            }))
            .collect();
        let env = PlanEnvelope::from_value(json!({ "resource_changes": resource_changes })).unwrap();
        let model = normalize(&env.input);

        let changed = model.items.iter().filter(|i| i.action != ActionKind::NoOp).count();
        prop_assert_eq!(model.counts.total(), changed);
    }

    #[test]
    fn score_is_bounded(items in items()) {
        let out = score(&items, &RiskConfig::default());
        prop_assert!(out.score <= 100);
        if items.iter().all(|i| i.action == ActionKind::NoOp) {
            prop_assert_eq!(out.score, 0);
            prop_assert_eq!(out.level, RiskLevel::Low);
        }
    }

    #[test]
    fn score_is_monotone_in_action_weight(
        mut items in items(),
        ty in resource_type(),
        slot in 0usize..24,
    ) {
        let cfg = RiskConfig::default();
        let slot = slot.min(items.len());
        items.insert(slot, item(999, ty, ActionKind::Create));

        let mut last = 0u8;
        for action in [ActionKind::Create, ActionKind::Update, ActionKind::Replace, ActionKind::Delete] {
            items[slot].action = action;
            let s = score(&items, &cfg).score;
            prop_assert!(s >= last, "{action} scored {s} below {last}");
            last = s;
        }
    }

    #[test]
    fn flagging_never_repeats_an_address(items in items()) {
        let mut doubled = items.clone();
        doubled.extend(items);
        let flagged = score(&doubled, &RiskConfig::default()).flagged_items;

        let mut seen = std::collections::HashSet::new();
        for f in &flagged {
            prop_assert!(seen.insert(f.address.clone()), "duplicate flag for {}", f.address);
        }
    }
}
