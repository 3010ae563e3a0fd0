//! # 元素层
//!
//! 以声明式选择器引用页面元素，调用方从不直接持有远程句柄。
//!
//! ## 主要功能
//! - **延迟解析**: 创建代理不产生远程调用，首次操作时才定位元素
//! - **失效检测**: 复用缓存句柄前先探测存活，失效后按策略重新定位
//! - **有界重试**: 分派过程中句柄失效时最多重试一次
//! - **前置同步**: 交互动作前等待元素存在、可见、可用
//! - **类型化变体**: 按 (标签, type) 注册表返回固定的变体集合
//!
//! ## 模块结构
//! - `selector`: 选择器与匹配条件
//! - `locator`: 单次远程查找
//! - `attributes`: 属性访问注册表
//! - `proxy`: 元素代理与解析状态机
//! - `actions`: 读取与用户动作
//! - `editable`: 表单控件包装类型
//! - `subtype`: 类型化变体

pub mod selector;
pub mod locator;
pub mod attributes;
pub mod proxy;
pub mod actions;
pub mod editable;
pub mod subtype;


pub use selector::{Criterion, Selector};
pub use locator::{ElementLocator, ResolutionOutcome};
pub use attributes::{AttributeKind, AttributeValue};
pub use proxy::Element;
pub use editable::{CheckBox, FileField, Radio, TextField};
pub use subtype::TypedElement;
