use tracing::info;

use candle_core::{DType, Device};

/// Device and weight precision used for inference.
#[derive(Debug, Clone)]
pub struct LlamaBackend {
    pub device: Device,
    pub dtype: DType,
}

impl Default for LlamaBackend {
    fn default() -> Self {
        let backend = Self {
            device: Device::Cpu,
            dtype: DType::F32,
        };
        info!(device = ?backend.device, dtype = ?backend.dtype, "backend initialized");

        backend
    }
}
