/*!
 * 通知流：按订阅者维护游标，过滤并增量推送日志中的通知
*/

mod notification_filter;
mod notification_stream;

pub use notification_filter::*;
pub use notification_stream::*;
