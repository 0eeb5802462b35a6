//! Productivity widgets invoked from the command line
//!
//! Each widget is a stateless [`Tool`]; everything it needs for one call
//! arrives in a [`ToolContext`].

mod contact;
pub mod files;
mod slides;
mod summarize;

pub use contact::ContactTool;
pub use files::CheckFilesTool;
pub use slides::SlidesToPdfTool;
pub use summarize::SummarizeTool;

use crate::config::AppConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result from tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_data: Option<Value>,
}

impl ToolOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            display_data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: message.into(),
            display_data: None,
        }
    }

    pub fn with_display(mut self, data: Value) -> Self {
        self.display_data = Some(data);
        self
    }
}

/// All context needed for a tool invocation.
#[derive(Clone)]
pub struct ToolContext {
    /// Relative paths are resolved against this directory
    pub working_dir: PathBuf,

    pub contact_url: String,

    pub convert_url: String,

    /// Upload limit, in bytes
    pub max_upload_bytes: u64,

    client: Client,
}

impl ToolContext {
    pub fn new(config: &AppConfig, working_dir: PathBuf, client: Client) -> Self {
        Self {
            working_dir,
            contact_url: config.contact_url.clone(),
            convert_url: config.convert_url.clone(),
            max_upload_bytes: config.max_upload_bytes(),
            client,
        }
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

/// A productivity widget
#[async_trait]
pub trait Tool: Send + Sync {
    /// Command name, typed after the slash
    fn name(&self) -> &'static str;

    fn description(&self) -> String;

    /// Argument synopsis shown in help
    fn usage(&self) -> &'static str;

    /// Execute the tool with all context provided via `ToolContext`
    async fn run(&self, input: Value, ctx: ToolContext) -> ToolOutput;
}

/// Collection of widgets available to the session
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn standard() -> Self {
        Self {
            tools: vec![
                Arc::new(SummarizeTool),
                Arc::new(CheckFilesTool),
                Arc::new(ContactTool),
                Arc::new(SlidesToPdfTool),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn tools(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    /// Execute a tool by name with context
    pub async fn execute(&self, name: &str, input: Value, ctx: ToolContext) -> Option<ToolOutput> {
        let tool = self.get(name)?;
        let output = tool.run(input, ctx).await;
        if output.success {
            tracing::info!(tool = name, "Tool succeeded");
        } else {
            tracing::warn!(tool = name, error = %output.output, "Tool failed");
        }
        Some(output)
    }
}

#[cfg(test)]
pub(crate) fn test_context(working_dir: &Path) -> ToolContext {
    ToolContext::new(&AppConfig::default(), working_dir.to_path_buf(), Client::new())
}
