/// 視野系統模組
///
/// 包含幾何工具、射線相交、可見區域計算與輸出格式
pub mod geometry_utils;
pub mod intersection;
pub mod vision_result;
pub mod visibility_engine;
pub mod vision_output;

pub use self::{
    geometry_utils::{Bounds, GeometryUtils},
    intersection::*,
    vision_result::*,
    visibility_engine::VisibilityEngine,
    vision_output::*,
};
