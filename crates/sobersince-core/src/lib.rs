//! # Sober Since Core Library
//!
//! This library provides the core business logic for the Sober Since
//! sobriety tracker. App shells stay thin: every behavior worth testing
//! lives here, behind plain types and a couple of traits at the platform
//! seams (settings persistence and notification delivery).
//!
//! ## Architecture
//!
//! - **Record**: The sobriety start date and display name, with the
//!   never-in-the-future invariant enforced at every mutation
//! - **Duration**: Calendar-aware breakdown and rendering of elapsed time
//! - **Milestones**: Day and monthly milestone computation with stable
//!   idempotency keys
//! - **Clock**: Wall-clock access and the once-a-second tick stream
//! - **Quote**: Motivational quote retrieval over HTTP
//! - **Storage**: Flat TOML-backed settings and profile persistence
//! - **Notify**: The notification backend seam and the
//!   cancel-then-reinstall reschedule flow
//!
//! ## Key Components
//!
//! - [`SobrietyRecord`]: The user's sobriety state
//! - [`Profile`]: Record plus notification preferences, persisted as a whole
//! - [`Ticker`]: Periodic clock source driving the live duration display
//! - [`QuoteService`]: HTTP client for the quote endpoint
//! - [`Notifier`]: Trait for platform notification backends

pub mod clock;
pub mod duration;
pub mod error;
pub mod milestones;
pub mod notify;
pub mod quote;
pub mod record;
pub mod storage;

pub use clock::{ClockSubscription, Ticker};
pub use duration::{format_duration, DisplayMode, DurationBreakdown};
pub use error::{ConfigError, CoreError, QuoteError, ValidationError};
pub use milestones::{compute_milestones, MilestoneRequest};
pub use notify::{reschedule, Notifier, Permission};
pub use quote::{Quote, QuoteResult, QuoteService, QuoteTask};
pub use record::{clamp_start, NotificationPreferences, SobrietyRecord};
pub use storage::{FileSettings, MemorySettings, Profile, SettingsStore};
