use std::collections::HashSet;

use crate::{chat::Notification, config::datatype::UserID};

/** `NotificationFilter` 通知流的过滤条件。
 * 类型集合为空时不过滤类型；user_id 只有在配置开启时才参与过滤
 */
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFilter {
    types: Option<HashSet<String>>,
    user_id: Option<UserID>,
}

impl NotificationFilter {
    pub fn new(types: Option<HashSet<String>>, user_id: Option<UserID>) -> Self {
        let types = types.filter(|types| !types.is_empty());
        return NotificationFilter { types, user_id };
    }

    /// 解析逗号分隔的类型列表，忽略空项与首尾空白
    pub fn parse_types(notification_types: Option<&str>) -> Option<HashSet<String>> {
        let types: HashSet<String> = notification_types?
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        if types.is_empty() {
            return None;
        }
        return Some(types);
    }

    pub fn from_request(
        user_id: &str,
        notification_types: Option<&str>,
        filter_by_user_id: bool,
    ) -> Self {
        let user_id = if filter_by_user_id {
            Some(user_id.to_string())
        } else {
            None
        };
        return Self::new(Self::parse_types(notification_types), user_id);
    }

    pub fn accepts(&self, notification: &Notification) -> bool {
        if let Some(types) = &self.types {
            if !types.contains(&notification.r#type) {
                return false;
            }
        }

        if let Some(user_id) = &self.user_id {
            if *user_id != notification.user_id {
                return false;
            }
        }

        return true;
    }
}
