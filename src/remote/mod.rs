//! # 远程协议层
//!
//! 元素层与 WebDriver 风格远程协议之间的接口。元素层只依赖 [`RemoteDriver`] trait，
//! 具体传输可以替换。
//!
//! ## 主要功能
//! - **元素查找**: 在文档或元素范围内按 CSS、XPath 或结构化查询查找元素
//! - **存活探测**: 低成本判断句柄是否仍然挂载在 DOM 上
//! - **属性读取**: DOM 属性、内容属性、计算样式、文本
//! - **用户动作**: 点击、双击、拖放、键盘输入
//! - **脚本原子**: 针对单个元素执行的封闭脚本集合
//! - **框架切换**: 会话级别的 frame 上下文
//!
//! ## 模块结构
//! - `traits`: 远程驱动 trait 定义
//! - `types`: 与传输无关的数据类型
//! - `atoms`: 元素脚本原子
//! - `webdriver`: W3C WebDriver HTTP 实现
//! - `mock`: 用于测试的内存 DOM 实现
//!
//! ## 使用示例
//! ```rust,no_run
//! use chaser_element::remote::{By, RemoteDriver, Scope, WebDriverClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WebDriverClient::connect("http://localhost:4444", serde_json::json!({})).await?;
//!
//! let buttons = client
//!     .find_elements(&Scope::Document, &By::Css("button".to_string()))
//!     .await?;
//! println!("Found {} buttons", buttons.len());
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod types;
pub mod atoms;
pub mod webdriver;
pub mod mock;

pub use traits::RemoteDriver;
pub use types::{
    By, ElementAction, ElementQuery, KeyInput, Liveness, Modifier, RemoteHandle, Scope,
    ScriptValue, SpecialKey,
};
pub use atoms::Atom;

// Re-export implementation structs
pub use webdriver::WebDriverClient;

// Re-export mock for development/testing
pub use mock::{ContextSwitch, MockDriver, MockNode};
