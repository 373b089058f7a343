//! Helpers shared by unit tests that need real GPU handles.

/// A device on wgpu's no-op backend: validates and tracks resources without
/// any hardware, so tests run headless.
pub(crate) async fn noop_device() -> (wgpu::Device, wgpu::Queue) {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::NOOP,
        backend_options: wgpu::BackendOptions {
            noop: wgpu::NoopBackendOptions { enable: true },
            ..Default::default()
        },
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions::default())
        .await
        .expect("noop adapter");
    adapter
        .request_device(&wgpu::DeviceDescriptor::default())
        .await
        .expect("noop device")
}
