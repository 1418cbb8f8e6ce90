//! Image resolution cache for game artwork
//!
//! Given a candidate image URL and a fallback label (the game title),
//! [`ImageResolver::resolve`] returns a URL known to load: the candidate when
//! its host is trusted and it loads, otherwise a deterministic placeholder
//! built from the label. Outcomes are cached for the retention window and a
//! [`SweepTask`] removes stale entries periodically.
//!
//! ```no_run
//! use game_image_resolver::config::Config;
//! use game_image_resolver::images::ImageResolver;
//!
//! # async fn demo() -> Result<(), game_image_resolver::errors::ProbeError> {
//! let resolver = ImageResolver::from_config(&Config::default())?;
//! let sweeper = resolver.start_sweeper();
//!
//! let url = resolver
//!     .resolve("https://images.unsplash.com/photo123", "Sea Battle")
//!     .await;
//! println!("{}", url);
//!
//! sweeper.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod fallback;
pub mod loader;
pub mod resolver;
pub mod sweeper;
pub mod trust;
pub mod types;

pub use fallback::{seed_for, FallbackTemplate};
pub use loader::{HttpImageLoader, ImageLoader};
pub use resolver::ImageResolver;
pub use sweeper::SweepTask;
pub use trust::TrustPolicy;
pub use types::{CacheEntry, CacheKey, EntryStatus, ResolverMetrics};
