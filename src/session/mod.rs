//! # 会话层
//!
//! 元素父链的根，持有远程驱动、配置和动作后检查器。
//!
//! ## 主要功能
//! - **会话根**: 顶层文档上下文，每次定位前切回默认内容
//! - **父链**: 会话、元素、frame 三种父级，子元素解析前先确保父级存活
//! - **Frame 上下文**: frame 切换是会话全局的，每次使用前重新切换
//! - **元素集合**: 按选择器批量定位，生成带回退条件的句柄代理
//! - **检查器**: 点击类动作之后运行的钩子
//!
//! ## 模块结构
//! - `root`: 会话根与检查器 trait
//! - `parent`: 父链与上下文切换
//! - `container`: 创建子代理的能力
//! - `frame`: frame 父级
//! - `collection`: 元素集合
//!
//! ## 使用示例
//! ```rust,no_run
//! use chaser_element::session::{Container, Session};
//! use chaser_element::{Config, Selector};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::connect(Config::from_env()?).await?;
//!
//! let submit = session.element(Selector::id("submit"));
//! submit.wait_until_present(None).await?;
//! submit.click(&[]).await?;
//! # Ok(())
//! # }
//! ```

pub mod root;
pub mod parent;
pub mod container;
pub mod frame;
pub mod collection;

#[cfg(test)]
pub mod tests;

pub use root::{Checker, Session};
pub use parent::Parent;
pub use container::Container;
pub use frame::Frame;
pub use collection::ElementCollection;
