//! Slack Integration - interactivity webhook support
//!
//! This crate provides the Slack side of honest-impressions:
//! - **Block Kit** (`blocks`) - typed modal builders and the impression modal
//! - **Interactions** (`interactions`) - payload model and the shortcut/submission dispatcher
//! - **Web API** (`client`) - `views.open` over HTTPS with a bot token
//!
//! # Getting Started
//!
//! 1. Create a Slack app at https://api.slack.com/apps
//! 2. Enable Interactivity and point the Request URL at `/api/new-impression`
//! 3. Add a global shortcut
//! 4. Set env var: `SLACK_BOT_TOKEN`
//!
//! # Architecture
//!
//! ```text
//! Slack interaction → InteractionDispatcher ─ shortcut ────────→ ViewsApi::open_view
//!                                           └ view_submission ─→ log + `{}`
//! ```

pub mod blocks;
pub mod client;
pub mod interactions;
