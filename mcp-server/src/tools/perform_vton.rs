//! `perform_vton`: render a selected garment onto the configured person.

use std::sync::Arc;

use async_trait::async_trait;
use openvto_inference::{ReplicateClient, open_in_browser};
use openvto_tools::{DataType, InputConstraints, ToolDefinition, ToolHandler, ToolInput, ToolOutput};
use serde::Deserialize;
use tracing::{info, warn};

pub const NAME: &str = "perform_vton";

const DESCRIPTION: &str = "Perform Virtual Try-On using IDM-VTON Deep Learning model. This tool is only to be called once the user has selected a garment/item to Virtual Try-On. If the user asks to call this directly without selecting a garment, kindly reject the request asking them to use either `local_search` or `couchbase_search`.";

#[derive(Debug, Deserialize)]
struct VtonArgs {
    garm_img: String,
    garment_des: String,
}

pub struct PerformVtonTool {
    definition: ToolDefinition,
    client: Arc<ReplicateClient>,
    human_img: String,
    open_browser: bool,
}

impl PerformVtonTool {
    pub fn new(client: Arc<ReplicateClient>, human_img: impl Into<String>) -> Self {
        let definition = ToolDefinition::new(NAME, DESCRIPTION)
            .with_input(
                ToolInput::required(
                    "garm_img",
                    DataType::String,
                    "The image link of the selected garment from `local_search` or `couchbase_search`",
                )
                .with_constraints(InputConstraints::non_empty()),
            )
            .with_input(ToolInput::required(
                "garment_des",
                DataType::String,
                "Description of garment e.g. Short Sleeve Round Neck T-shirt from the `local_search` or `couchbase_search` selection",
            ));

        Self {
            definition,
            client,
            human_img: human_img.into(),
            open_browser: true,
        }
    }

    /// Whether to open results in the system browser.
    pub fn with_open_browser(mut self, open_browser: bool) -> Self {
        self.open_browser = open_browser;
        self
    }
}

#[async_trait]
impl ToolHandler for PerformVtonTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, args: serde_json::Value) -> anyhow::Result<ToolOutput> {
        let VtonArgs {
            garm_img,
            garment_des,
        } = serde_json::from_value(args)?;
        info!(
            "Starting try-on: garment {garm_img}, person {}, description {garment_des:?}",
            self.human_img
        );

        let request = self
            .client
            .request()
            .with_input("garm_img", garm_img)
            .with_input("human_img", self.human_img.as_str())
            .with_input("garment_des", garment_des);

        let url = self.client.run(&request).await?;
        info!("Try-on result: {url}");

        if self.open_browser {
            show(&url);
        }

        Ok(ToolOutput::text(url))
    }
}

fn show(url: &str) {
    if let Err(e) = open_in_browser(url) {
        warn!("Could not open {url}: {e}");
    }
}
