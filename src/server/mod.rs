/*!
 * 服务器共享状态与连接池
*/

pub mod connection_registry;
pub mod server_state;
