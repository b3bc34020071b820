use common::{db::digest_for_lookup, settings::types::Settings};
use db_adapters::push_subscription_adapter::{PushSubscriptionAdapter, PushSubscriptionMutation};
use tracing::{event, Level};
use types::PushUnsubscribeRequest;

use crate::{error_500, UseCaseError};

/// Removes the record for the endpoint. Succeeds whether or not one existed.
pub async fn unsubscribe_push<'a>(
    settings: &Settings,
    params: PushUnsubscribeRequest,
    push_subscription_adapter: PushSubscriptionAdapter<'a>,
) -> Result<(), UseCaseError> {
    let endpoint_digest = digest_for_lookup(&params.endpoint, settings).map_err(error_500)?;
    let deleted = push_subscription_adapter
        .delete_by_endpoint_digest(&endpoint_digest)
        .await
        .map_err(error_500)?;
    event!(Level::DEBUG, deleted, "push subscription removed");
    Ok(())
}
