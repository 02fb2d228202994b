use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A startup parameter that cannot produce a valid arena or population.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The GPU context could not be created.
    #[error("gpu initialization failed: {0}")]
    Gpu(String),

    /// The swapchain failed in a way that can't be recovered by reconfiguring.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_names_the_parameter() {
        let e = Error::InvalidConfig("radius must be > 0".to_string());
        let msg = e.to_string();
        assert!(msg.contains("invalid configuration"));
        assert!(msg.contains("radius"));
    }

    #[test]
    fn surface_errors_convert() {
        let e: Error = wgpu::SurfaceError::OutOfMemory.into();
        assert!(matches!(e, Error::Surface(wgpu::SurfaceError::OutOfMemory)));
    }
}
