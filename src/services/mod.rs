// Stateless services: blob codec, cookie domain resolution, external notification.

pub mod codec;
pub mod domain;
pub mod notifier;
