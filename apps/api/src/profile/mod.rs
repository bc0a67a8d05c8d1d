// Profile persistence: one JSONB document per user, shallow-merged on save,
// with the resume binary stored alongside it in dedicated columns.

pub mod handlers;
pub mod store;
