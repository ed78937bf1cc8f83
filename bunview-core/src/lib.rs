/// Bunview Core Library - scene model, picking and the interaction session
///
/// This library holds everything the hosts share: geometry and camera math,
/// ray picking, asset decoding, the orbit camera rig and the per-frame
/// interaction loop that drives hover scaling and drag-to-move.

pub mod assets;
pub mod config;
pub mod device;
pub mod frame;
pub mod geometry;
pub mod model;
pub mod motion;
pub mod pointer;
pub mod projection;
pub mod ray;
pub mod rig;
pub mod scene;
pub mod session;
pub mod stl;
pub mod transform;
pub mod viewport;

// Re-export commonly used types
pub use assets::{AssetError, AssetProvider, BuiltinAssetProvider, FileAssetProvider};
pub use config::StageConfig;
pub use device::DeviceProfile;
pub use frame::{drive_frame, FrameClock, FrameView, Rasterizer};
pub use geometry::{Mesh, Triangle, Vertex};
pub use model::{Bone, Model, ModelPart, Skeleton};
pub use projection::Camera;
pub use ray::{Ray, RayHit};
pub use session::{Cursor, FrameReport, InteractionSession, InteractionState};
pub use transform::{NodeTransform, RotationState, Transform};
pub use viewport::{RenderSurface, Viewport};
