//! Lambda entry points. Each binary under `src/bin` builds one of these once per cold start.

pub mod ai_check_lineup;
pub mod check_lineup;
pub mod fixture_cron;
pub mod make_call;
pub mod rotate_secret;
