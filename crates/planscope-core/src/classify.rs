use crate::model::ActionKind;

/// Maps a raw Terraform action set to a single [`ActionKind`].
///
/// Precedence (first match wins):
/// 1. `create` and `delete` together: [`ActionKind::Replace`]
/// 2. `delete`: [`ActionKind::Delete`]
/// 3. `create`: [`ActionKind::Create`]
/// 4. `update`: [`ActionKind::Update`]
/// 5. anything else: [`ActionKind::NoOp`]
///
/// Rule 1 is checked before `update`, so `["create", "delete", "update"]` is still a replace.
pub fn classify<S: AsRef<str>>(actions: &[S]) -> ActionKind {
    let has = |tag: &str| actions.iter().any(|a| a.as_ref() == tag);

    let create = has("create");
    let delete = has("delete");
    if create && delete {
        ActionKind::Replace
    } else if delete {
        ActionKind::Delete
    } else if create {
        ActionKind::Create
    } else if has("update") {
        ActionKind::Update
    } else {
        ActionKind::NoOp
    }
}
