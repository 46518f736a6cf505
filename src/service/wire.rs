//! XML payloads of the USPS `Verify` API.
//!
//! Request:
//!
//! ```xml
//! <AddressValidateRequest USERID="...">
//!   <Revision>1</Revision>
//!   <Address ID="0">
//!     <Address1/><Address2>...</Address2><City>...</City>
//!     <State>..</State><Zip5>.....</Zip5><Zip4/>
//!   </Address>
//! </AddressValidateRequest>
//! ```
//!
//! The response mirrors the `Address` element; service errors come back as
//! an `<Error>` element either at the root or inside `Address`.

use crate::domain::model::{AddressRequest, AddressResult};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

pub const ERROR_MARKER: &str = "<Error>";
const REVISION: u8 = 1;

#[derive(Debug, Serialize)]
#[serde(rename = "AddressValidateRequest")]
struct ValidateRequest<'a> {
    #[serde(rename = "@USERID")]
    user_id: &'a str,
    #[serde(rename = "Revision")]
    revision: u8,
    #[serde(rename = "Address")]
    address: RequestAddress<'a>,
}

#[derive(Debug, Serialize)]
struct RequestAddress<'a> {
    #[serde(rename = "@ID")]
    id: u32,
    #[serde(rename = "Address1")]
    address1: &'a str,
    #[serde(rename = "Address2")]
    address2: &'a str,
    #[serde(rename = "City")]
    city: &'a str,
    #[serde(rename = "State")]
    state: &'a str,
    #[serde(rename = "Zip5")]
    zip5: &'a str,
    #[serde(rename = "Zip4")]
    zip4: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    #[serde(rename = "Address")]
    address: ResponseAddress,
}

#[derive(Debug, Deserialize)]
struct ResponseAddress {
    #[serde(rename = "Address1", default)]
    address1: String,
    #[serde(rename = "Address2", default)]
    address2: String,
    #[serde(rename = "City", default)]
    city: String,
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "Zip5", default)]
    zip5: String,
    #[serde(rename = "Zip4", default)]
    zip4: String,
}

pub fn compose_request(user_id: &str, request: &AddressRequest) -> Result<String> {
    let payload = ValidateRequest {
        user_id,
        revision: REVISION,
        address: RequestAddress {
            id: 0,
            address1: &request.address1,
            address2: &request.address2,
            city: &request.city,
            state: &request.state,
            zip5: &request.zip5,
            zip4: &request.zip4,
        },
    };
    Ok(quick_xml::se::to_string(&payload)?)
}

/// Request XML, percent-encoded for the `XML=` query parameter.
pub fn encode_request(user_id: &str, request: &AddressRequest) -> Result<String> {
    let xml = compose_request(user_id, request)?;
    Ok(urlencoding::encode(&xml).into_owned())
}

/// `Ok(None)` for bodies that carry no address: blank or service errors.
/// `Err` only when the body claims success but is not a valid response.
pub fn parse_response(body: &str) -> Result<Option<AddressResult>> {
    if body.trim().is_empty() || body.contains(ERROR_MARKER) {
        return Ok(None);
    }

    let parsed: ValidateResponse = quick_xml::de::from_str(body)?;
    let address = parsed.address;
    Ok(Some(AddressResult {
        address1: address.address1,
        address2: address.address2,
        city: address.city,
        state: address.state,
        zip5: address.zip5,
        zip4: address.zip4,
    }))
}
