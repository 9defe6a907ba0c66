//! # screen-size
//! Responsive breakpoint resolution for UI layers: named viewport-width
//! bands (`xs`/`sm`/`md`/`lg`/`xlg`), media-query range generation, and
//! stylesheet-driven threshold overrides loaded at startup.
//!
//! ## Example
//! ```rust
//! use screen_size::{Breakpoint, Breakpoints, SizeResolver, SizeToken, Viewport};
//!
//! // Startup: resolve the configuration (optionally overridden via
//! // `Breakpoints::load`), then build the resolver once.
//! let breakpoints = Breakpoints::default();
//! let resolver = SizeResolver::new(&breakpoints);
//!
//! // `sm` and `md` are adjacent, so they collapse into one range.
//! let queries = resolver.queries(&[
//!     SizeToken::Name(Breakpoint::Sm),
//!     SizeToken::Name(Breakpoint::Md),
//! ]);
//! assert_eq!(queries[0].to_string(), "(min-width: 600px) and (max-width: 1279px)");
//!
//! // Evaluate against a concrete viewport and react to changes.
//! let viewport = Viewport::new(800.0);
//! assert!(viewport.is_matched(&queries));
//! ```
//!
//! ## Startup sequencing
//! [`Breakpoints::load`] runs once, before the [`SizeResolver`] is built,
//! and never fails: a missing or malformed override source falls back to
//! the defaults key by key. After construction the resolver is immutable
//! and every query is a pure function, safe to call concurrently.
//!
//! ## Overrides
//! The override source is any text containing `<key> : <number>px`
//! declarations for the keys `smScreenWidth`, `mdScreenWidth`,
//! `lgScreenWidth` and `xlgScreenWidth` — typically an SCSS variables file
//! shared with the host's stylesheets.

pub mod breakpoints;
pub mod query;
pub mod responsive;
pub mod source;
pub mod watch;

pub use breakpoints::Breakpoints;
pub use query::WidthQuery;
pub use responsive::{Breakpoint, ResolveError, ScreenSize, SizeResolver, SizeToken, range};
#[cfg(feature = "tokio")]
pub use source::FileSource;
pub use source::OverrideSource;
pub use watch::{Viewport, WatchHandle};
