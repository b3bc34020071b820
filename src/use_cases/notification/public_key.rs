use common::settings::types::Settings;
use types::PublicKeyResponse;

use crate::{error_500, notification::web_push_messenger::VapidSignatureBuilder, UseCaseError};

pub fn get_public_key(settings: &Settings) -> Result<PublicKeyResponse, UseCaseError> {
    let builder = VapidSignatureBuilder::new(settings).map_err(error_500)?;
    Ok(PublicKeyResponse {
        public_key: builder.public_key(),
    })
}
