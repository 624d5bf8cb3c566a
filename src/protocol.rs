//! Wire format of the remote ball physics endpoint
//!
//! `POST /update_ball` with body `{"ball": {"x":..,"y":..,"dx":..,"dy":..}}`,
//! reply body is the advanced ball object itself.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sim::Ball2d;

/// Route of the physics endpoint
pub const UPDATE_BALL_PATH: &str = "/update_ball";

/// Request body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateBallRequest {
    pub ball: Ball2d,
}

/// Error body returned with 4xx replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: String,
}

pub fn encode_request(req: &UpdateBallRequest) -> Result<String> {
    serde_json::to_string(req).map_err(Error::Encode)
}

pub fn decode_request(body: &str) -> Result<UpdateBallRequest> {
    serde_json::from_str(body).map_err(Error::Decode)
}

pub fn encode_reply(ball: &Ball2d) -> Result<String> {
    serde_json::to_string(ball).map_err(Error::Encode)
}

pub fn decode_reply(body: &str) -> Result<Ball2d> {
    serde_json::from_str(body).map_err(Error::Decode)
}
