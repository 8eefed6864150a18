//! # Inference
//!
//! Runs the IDM-VTON virtual try-on model on Replicate and hands the
//! resulting image to the user.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use openvto_inference::{ReplicateClient, ReplicateConfig};
//!
//! let client = ReplicateClient::new(ReplicateConfig {
//!     api_token,
//!     ..Default::default()
//! })?;
//! let request = client
//!     .request()
//!     .with_input("garm_img", garment_url)
//!     .with_input("human_img", person_url)
//!     .with_input("garment_des", "cute pink top");
//!
//! let image_url = client.run(&request).await?;
//! ```

pub mod browser;
pub mod error;
pub mod replicate;

pub use browser::open_in_browser;
pub use error::{InferenceError, Result};
pub use replicate::{
    Prediction, PredictionRequest, PredictionStatus, ReplicateClient, ReplicateConfig,
};

/// Replicate version of `cuuupid/idm-vton`.
pub const IDM_VTON_VERSION: &str =
    "0513734a452173b8173e907e3a59d19a36266e55b48528559432bd21c7d7e985";
