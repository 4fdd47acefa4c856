//! 数据模型模块
//! 资源范围、角色、意图注册表、权限查询、会话与路由模型

pub mod intent;
pub mod query;
pub mod role;
pub mod route;
pub mod scope;
pub mod session;
