use std::{
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
    time::Instant,
};

use bevy_ecs::prelude::*;
use tokio::sync::{mpsc, oneshot};

use crate::core::error::AssetError;

// --- GLTF Support ---

type GltfData = (gltf::Document, Vec<gltf::buffer::Data>, Vec<gltf::image::Data>);

#[derive(Clone, Debug)]
pub struct GltfScene {
    pub data: Arc<GltfData>,
}

impl GltfScene {
    pub fn document(&self) -> &gltf::Document {
        &self.data.0
    }

    pub fn buffers(&self) -> &[gltf::buffer::Data] {
        &self.data.1
    }
}

/// 纹理像素的色彩空间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// 颜色贴图（烘焙光照）
    Srgb,
    /// 数据贴图（粒子透明度）
    Linear,
}

/// 解码完成、尚未上传到GPU的纹理
#[derive(Clone, Debug)]
pub struct LoadedTexture {
    pub image: Arc<image::RgbaImage>,
    pub color_space: ColorSpace,
}

// --- Handle System ---

#[derive(Clone, Debug)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

#[derive(Debug)]
pub struct AssetContainer<T> {
    pub state: RwLock<LoadState<T>>,
}

#[derive(Clone, Component, Debug)]
pub struct Handle<T: 'static + Send + Sync> {
    pub container: Arc<AssetContainer<T>>,
}

impl<T: 'static + Send + Sync> Handle<T> {
    pub fn new_loading() -> Self {
        Self {
            container: Arc::new(AssetContainer {
                state: RwLock::new(LoadState::Loading),
            }),
        }
    }

    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.container
            .state
            .read()
            .ok()
            .and_then(|state| match &*state {
                LoadState::Loaded(v) => Some(v.clone()),
                _ => None,
            })
    }

    pub fn is_loaded(&self) -> bool {
        self.container
            .state
            .read()
            .ok()
            .map(|state| matches!(*state, LoadState::Loaded(_)))
            .unwrap_or(false)
    }

    pub fn is_failed(&self) -> bool {
        self.container
            .state
            .read()
            .ok()
            .map(|state| matches!(*state, LoadState::Failed(_)))
            .unwrap_or(false)
    }

    /// 两个句柄是否指向同一次加载请求
    pub fn same_asset(&self, other: &Handle<T>) -> bool {
        Arc::ptr_eq(&self.container, &other.container)
    }

    pub fn get_status(&self) -> Result<String, &'static str> {
        self.container
            .state
            .read()
            .map_err(|_| "Lock poisoned")
            .map(|state| match &*state {
                LoadState::Loading => "loading".to_string(),
                LoadState::Loaded(_) => "loaded".to_string(),
                LoadState::Failed(err) => format!("failed: {}", err),
            })
    }

    fn set(&self, value: LoadState<T>) {
        if let Ok(mut state) = self.container.state.write() {
            *state = value;
        }
    }
}

// --- Asset Server ---

enum AssetTask {
    Texture {
        path: PathBuf,
        handle: Handle<LoadedTexture>,
        color_space: ColorSpace,
        start: Instant,
    },
    Gltf {
        path: PathBuf,
        handle: Handle<GltfScene>,
        start: Instant,
    },
}

enum AssetPayload {
    Image(image::RgbaImage),
    Gltf(GltfScene),
}

type TaskOutcome = (AssetTask, Result<AssetPayload, AssetError>);

/// 后台资源加载器
///
/// 独立的`asset-loader`线程运行单线程tokio运行时；主线程每帧调用[`AssetServer::update`]
/// 取回完成的任务。加载失败只产生`*Failed`事件，不重试。
#[derive(Resource)]
pub struct AssetServer {
    tx: mpsc::UnboundedSender<AssetTask>,
    rx: mpsc::UnboundedReceiver<TaskOutcome>,
    worker_handle: Option<std::thread::JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

#[derive(Clone, Debug)]
pub enum AssetEvent {
    TextureLoaded(Handle<LoadedTexture>, f32),
    GltfLoaded(Handle<GltfScene>, f32),
    TextureFailed(Handle<LoadedTexture>, AssetError),
    GltfFailed(Handle<GltfScene>, AssetError),
}

impl AssetServer {
    pub fn new() -> std::io::Result<Self> {
        let (task_tx, task_rx) = mpsc::unbounded_channel::<AssetTask>();
        let (done_tx, done_rx) = mpsc::unbounded_channel::<TaskOutcome>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker_handle = std::thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        tracing::error!(target: "assets", "Failed to create asset loader runtime: {}", e);
                        return;
                    }
                };

                rt.block_on(async move {
                    let mut shutdown_rx = shutdown_rx;
                    let mut task_rx = task_rx;

                    loop {
                        tokio::select! {
                            _ = &mut shutdown_rx => {
                                tracing::info!(target: "assets", "Asset loader received shutdown signal");
                                break;
                            }
                            task = task_rx.recv() => {
                                match task {
                                    Some(task) => {
                                        let tx = done_tx.clone();
                                        tokio::spawn(async move {
                                            let result = match &task {
                                                AssetTask::Texture { path, .. } => load_image(path).await,
                                                AssetTask::Gltf { path, .. } => load_gltf(path).await,
                                            };
                                            let _ = tx.send((task, result));
                                        });
                                    }
                                    None => {
                                        tracing::info!(target: "assets", "Asset task channel closed");
                                        break;
                                    }
                                }
                            }
                        }
                    }
                });
            })?;

        Ok(Self {
            tx: task_tx,
            rx: done_rx,
            worker_handle: Some(worker_handle),
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn load_texture(&self, path: &Path, color_space: ColorSpace) -> Handle<LoadedTexture> {
        let handle = Handle::new_loading();
        tracing::debug!(target: "assets", "Queue texture {} ({:?})", path.display(), color_space);
        let task = AssetTask::Texture {
            path: path.to_path_buf(),
            handle: handle.clone(),
            color_space,
            start: Instant::now(),
        };
        if self.tx.send(task).is_err() {
            handle.set(LoadState::Failed("asset loader is not running".to_string()));
        }
        handle
    }

    pub fn load_gltf(&self, path: &Path) -> Handle<GltfScene> {
        let handle = Handle::new_loading();
        tracing::debug!(target: "assets", "Queue model {}", path.display());
        let task = AssetTask::Gltf {
            path: path.to_path_buf(),
            handle: handle.clone(),
            start: Instant::now(),
        };
        if self.tx.send(task).is_err() {
            handle.set(LoadState::Failed("asset loader is not running".to_string()));
        }
        handle
    }

    // This must be called in the main thread loop
    pub fn update(&mut self) -> Vec<AssetEvent> {
        let mut events = Vec::new();
        while let Ok((task, result)) = self.rx.try_recv() {
            match (task, result) {
                (
                    AssetTask::Texture {
                        handle,
                        color_space,
                        start,
                        ..
                    },
                    Ok(AssetPayload::Image(img)),
                ) => {
                    let ms = start.elapsed().as_secs_f32() * 1000.0;
                    handle.set(LoadState::Loaded(LoadedTexture {
                        image: Arc::new(img),
                        color_space,
                    }));
                    events.push(AssetEvent::TextureLoaded(handle, ms));
                }
                (AssetTask::Gltf { handle, start, .. }, Ok(AssetPayload::Gltf(scene))) => {
                    let ms = start.elapsed().as_secs_f32() * 1000.0;
                    handle.set(LoadState::Loaded(scene));
                    events.push(AssetEvent::GltfLoaded(handle, ms));
                }
                (AssetTask::Texture { handle, .. }, Err(e)) => {
                    handle.set(LoadState::Failed(e.to_string()));
                    events.push(AssetEvent::TextureFailed(handle, e));
                }
                (AssetTask::Gltf { handle, .. }, Err(e)) => {
                    handle.set(LoadState::Failed(e.to_string()));
                    events.push(AssetEvent::GltfFailed(handle, e));
                }
                (AssetTask::Texture { handle, .. }, Ok(_)) => {
                    let e = AssetError::Decode("unexpected payload for texture".to_string());
                    handle.set(LoadState::Failed(e.to_string()));
                    events.push(AssetEvent::TextureFailed(handle, e));
                }
                (AssetTask::Gltf { handle, .. }, Ok(_)) => {
                    let e = AssetError::Decode("unexpected payload for model".to_string());
                    handle.set(LoadState::Failed(e.to_string()));
                    events.push(AssetEvent::GltfFailed(handle, e));
                }
            }
        }
        events
    }
}

async fn load_image(path: &Path) -> Result<AssetPayload, AssetError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AssetError::from_io(path, &e))?;
    let display = path.display().to_string();
    // Decode in blocking task
    tokio::task::spawn_blocking(move || {
        image::load_from_memory(&bytes)
            .map(|img| AssetPayload::Image(img.to_rgba8()))
            .map_err(|e| AssetError::LoadFailed {
                path: display,
                reason: e.to_string(),
            })
    })
    .await
    .map_err(|e| AssetError::Decode(e.to_string()))?
}

async fn load_gltf(path: &Path) -> Result<AssetPayload, AssetError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AssetError::from_io(path, &e))?;
    let display = path.display().to_string();
    // 外部.bin和图片相对于模型文件所在目录解析
    let base = path.parent().map(Path::to_path_buf);
    tokio::task::spawn_blocking(move || {
        import_gltf(&bytes, base.as_deref())
            .map(|data| {
                AssetPayload::Gltf(GltfScene {
                    data: Arc::new(data),
                })
            })
            .map_err(|e| AssetError::LoadFailed {
                path: display,
                reason: e.to_string(),
            })
    })
    .await
    .map_err(|e| AssetError::Decode(e.to_string()))?
}

fn import_gltf(bytes: &[u8], base: Option<&Path>) -> gltf::Result<GltfData> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, base, blob)?;
    let images = gltf::import_images(&document, base, &buffers)?;
    Ok((document, buffers, images))
}

impl Drop for AssetServer {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }

        if let Some(handle) = self.worker_handle.take() {
            if let Err(e) = handle.join() {
                tracing::error!(target: "assets", "Asset loader thread panicked: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn drain_until<F: Fn(&[AssetEvent]) -> bool>(server: &mut AssetServer, done: F) -> Vec<AssetEvent> {
        let mut events = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            events.extend(server.update());
            if done(&events) {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn test_handle_lifecycle() {
        let handle: Handle<u32> = Handle::new_loading();
        assert!(!handle.is_loaded());
        assert_eq!(handle.get_status(), Ok("loading".to_string()));

        handle.set(LoadState::Loaded(7));
        assert_eq!(handle.get(), Some(7));
        assert!(handle.same_asset(&handle.clone()));
        assert!(!handle.same_asset(&Handle::new_loading()));
    }

    #[test]
    fn test_missing_texture_reports_not_found() {
        let mut server = AssetServer::new().expect("spawn loader");
        let handle = server.load_texture(Path::new("definitely/missing.png"), ColorSpace::Srgb);
        let events = drain_until(&mut server, |e| !e.is_empty());

        assert_eq!(events.len(), 1);
        match &events[0] {
            AssetEvent::TextureFailed(h, AssetError::NotFound { .. }) => assert!(h.same_asset(&handle)),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(handle.is_failed());
    }

    #[test]
    fn test_texture_decodes_to_rgba() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dot.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 255, 0, 255]))
            .save(&path)
            .expect("write png");

        let mut server = AssetServer::new().expect("spawn loader");
        let handle = server.load_texture(&path, ColorSpace::Linear);
        let events = drain_until(&mut server, |e| !e.is_empty());

        assert!(matches!(events.as_slice(), [AssetEvent::TextureLoaded(..)]));
        let texture = handle.get().expect("loaded");
        assert_eq!(texture.color_space, ColorSpace::Linear);
        assert_eq!(texture.image.dimensions(), (2, 2));
        assert_eq!(texture.image.get_pixel(0, 0).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_invalid_model_fails_silently() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.glb");
        std::fs::write(&path, b"not a model").expect("write");

        let mut server = AssetServer::new().expect("spawn loader");
        let handle = server.load_gltf(&path);
        let events = drain_until(&mut server, |e| !e.is_empty());

        assert!(matches!(events.as_slice(), [AssetEvent::GltfFailed(..)]));
        assert!(handle.get().is_none());
    }

    #[test]
    fn test_gltf_with_external_buffer_loads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let bin: Vec<u8> = positions.iter().flat_map(|v| v.to_le_bytes()).collect();
        std::fs::write(dir.path().join("triangle.bin"), &bin).expect("write bin");
        let path = dir.path().join("triangle.gltf");
        std::fs::write(
            &path,
            r#"{
                "asset": { "version": "2.0" },
                "scene": 0,
                "scenes": [{ "nodes": [0] }],
                "nodes": [{ "name": "baked", "mesh": 0 }],
                "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
                "accessors": [{
                    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
                }],
                "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
                "buffers": [{ "byteLength": 36, "uri": "triangle.bin" }]
            }"#,
        )
        .expect("write gltf");

        let mut server = AssetServer::new().expect("spawn loader");
        let handle = server.load_gltf(&path);
        let events = drain_until(&mut server, |e| !e.is_empty());

        assert!(
            matches!(events.as_slice(), [AssetEvent::GltfLoaded(..)]),
            "unexpected events: {:?}",
            events
        );
        let scene = handle.get().expect("loaded");
        assert_eq!(scene.buffers().len(), 1);
        assert_eq!(scene.buffers()[0].len(), 36);
    }
}
