//! Domain types shared by the session, the UI loop and the collaborators.

mod feed;
mod instance;
mod post;
mod subscription;

pub use feed::FeedKind;
pub use instance::Instance;
pub use post::{Post, PostId, PostUser};
pub use subscription::{Subscription, SubscriptionId};
