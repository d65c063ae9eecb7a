//! 资源加载
//!
//! - [`manager`]：后台线程异步读取与解码纹理、glTF模型
//! - [`model`]：把已加载的glTF场景拆分为带材质标签的根节点

pub mod manager;
pub mod model;

pub use manager::{
    AssetEvent, AssetServer, ColorSpace, GltfScene, Handle, LoadState, LoadedTexture,
};
pub use model::{
    import_model_nodes, spawn_model, MaterialKind, MeshData, MeshMaterial, ModelNode,
    ModelNodeName,
};
