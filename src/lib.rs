//! # Bathroom Scene
//!
//! A real-time 3D bathroom scene rendered with wgpu: a baked-lightmap model,
//! a falling water stream and rising droplets, orbited by the mouse.
//!
//! ## Features
//!
//! - **Baked Lighting**: glTF model textured with a precomputed lightmap, emissive sconce shades
//! - **Particles**: CPU-driven water points and shader-animated droplets
//! - **Orbit Controls**: Damped rotate / pan / dolly around a target
//! - **Async Assets**: Textures and models decoded on a background loader thread
//!
//! ## Frame Order
//!
//! Each display refresh drains finished asset loads, then runs one ECS schedule
//! (time → water → droplet time → controls), uploads dirty particle buffers and
//! submits a single render pass.
//!
//! ## Modules
//!
//! - [`core`]: Engine entry point, render loop and errors
//! - [`config`]: Scene configuration (TOML/JSON/env)
//! - [`scene`]: Scene context and resize handling
//! - [`camera`]: Perspective camera and orbit controls
//! - [`render`]: wgpu renderer and particle state
//! - [`resources`]: Asset loading and model import

/// Core engine functionality including the main loop and error types
pub mod core;
/// Scene configuration
pub mod config;
/// Shared ECS resources
pub mod ecs;
/// Window and input abstraction
pub mod platform;
/// Rendering system and particle clouds
pub mod render;
/// Asset loading for textures and glTF models
pub mod resources;
/// Scene context driving the per-frame schedule
pub mod scene;
/// Perspective camera and orbit controls
pub mod camera;
