//! Order submission port trait.

use crate::domain::order::OrderIntent;

/// Fire-and-forget: the engine never inspects the outcome. Transport failures
/// are the implementation's concern to log or retry.
pub trait BrokerExecutionPort {
    fn submit(&self, intent: &OrderIntent);
}
