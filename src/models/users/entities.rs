use serde::{Deserialize, Serialize};

// 账户角色
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Teacher, // 教师
    Student, // 学生
}

impl UserRole {
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::STUDENT => Ok(UserRole::Student),
            _ => Err(serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: teacher, student"
            ))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(UserRole::Teacher),
            "student" => Ok(UserRole::Student),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 账户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password: String,
    pub role: UserRole,
    pub display_name: String,
    pub email: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::from_str("teacher").unwrap(), UserRole::Teacher);
        assert_eq!(UserRole::from_str("student").unwrap(), UserRole::Student);
        assert_eq!(UserRole::Teacher.to_string(), "teacher");
        assert_eq!(UserRole::Student.to_string(), "student");
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!(UserRole::from_str("admin").is_err());
        assert!(serde_json::from_str::<UserRole>("\"admin\"").is_err());
    }

    #[test]
    fn test_account_password_not_serialized() {
        let account = Account {
            id: 1,
            username: "t1".to_string(),
            password: "123".to_string(),
            role: UserRole::Teacher,
            display_name: "张老师".to_string(),
            email: None,
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("\"password\""));
        assert!(json.contains("\"username\":\"t1\""));
    }
}
