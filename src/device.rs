//! Compute device selection.
//!
//! whisper.cpp decides at build time which accelerator backends it links against (via the
//! `cuda`, `metal`, `hipblas` and `vulkan` features). At runtime we only choose whether to use
//! one, and whether to turn on half-precision kernels along with it.

use std::fmt;

/// Where inference runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Gpu,
    Cpu,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Gpu => f.write_str("gpu"),
            Device::Cpu => f.write_str("cpu"),
        }
    }
}

/// The device to run on and the precision flag that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSelection {
    pub device: Device,

    /// Reduced-precision (flash attention) kernels. Only meaningful on the GPU.
    pub half_precision: bool,
}

impl DeviceSelection {
    pub fn cpu() -> Self {
        Self {
            device: Device::Cpu,
            half_precision: false,
        }
    }

    pub fn gpu() -> Self {
        Self {
            device: Device::Gpu,
            half_precision: true,
        }
    }

    pub fn use_gpu(&self) -> bool {
        self.device == Device::Gpu
    }
}

/// Capability check for accelerated compute.
pub trait AcceleratorProbe {
    fn accelerator_available(&self) -> bool;
}

/// Reports the accelerator backends compiled into whisper.cpp.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompiledAccelerators;

impl AcceleratorProbe for CompiledAccelerators {
    fn accelerator_available(&self) -> bool {
        cfg!(any(
            feature = "cuda",
            feature = "metal",
            feature = "hipblas",
            feature = "vulkan"
        ))
    }
}

/// Pick the GPU when one is available and not overridden by `force_cpu`, else the CPU.
pub fn select_device(probe: &dyn AcceleratorProbe, force_cpu: bool) -> DeviceSelection {
    if !force_cpu && probe.accelerator_available() {
        DeviceSelection::gpu()
    } else {
        DeviceSelection::cpu()
    }
}
