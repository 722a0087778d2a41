use std::fmt;
use std::str::FromStr;

use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// 用户立场
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "lowercase")]
pub enum Stance {
    /// 正方
    #[default]
    For,
    /// 反方
    Against,
}

impl Stance {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Stance::For => "for",
            Stance::Against => "against",
        }
    }
}

impl FromStr for Stance {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "for" | "pro" => Ok(Stance::For),
            "against" | "con" => Ok(Stance::Against),
            _ => Err(ValidationError::InvalidStance {
                value: s.to_string(),
            }),
        }
    }
}

/// 专业水平别名表（兼容不同版本表单的取值）
static EXPERTISE_ALIASES: phf::Map<&'static str, ExpertiseLevel> = phf_map! {
    "school" => ExpertiseLevel::School,
    "beginner" => ExpertiseLevel::School,
    "high school" => ExpertiseLevel::School,
    "high-school" => ExpertiseLevel::School,
    "undergraduate" => ExpertiseLevel::Undergraduate,
    "college" => ExpertiseLevel::Undergraduate,
    "graduate" => ExpertiseLevel::Graduate,
    "masters" => ExpertiseLevel::Graduate,
    "phd" => ExpertiseLevel::Phd,
    "ph.d." => ExpertiseLevel::Phd,
    "doctorate" => ExpertiseLevel::Phd,
};

/// 用户专业水平
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "lowercase")]
pub enum ExpertiseLevel {
    /// 中学
    #[default]
    School,
    /// 本科
    Undergraduate,
    /// 研究生
    Graduate,
    /// 博士
    Phd,
}

impl ExpertiseLevel {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            ExpertiseLevel::School => "school",
            ExpertiseLevel::Undergraduate => "undergraduate",
            ExpertiseLevel::Graduate => "graduate",
            ExpertiseLevel::Phd => "phd",
        }
    }
}

impl FromStr for ExpertiseLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EXPERTISE_ALIASES
            .get(s.trim().to_lowercase().as_str())
            .copied()
            .ok_or_else(|| ValidationError::InvalidExpertiseLevel {
                value: s.to_string(),
            })
    }
}

/// 难度别名表
static DIFFICULTY_ALIASES: phf::Map<&'static str, Difficulty> = phf_map! {
    "easy" => Difficulty::Easy,
    "beginner" => Difficulty::Easy,
    "medium" => Difficulty::Medium,
    "intermediate" => Difficulty::Medium,
    "hard" => Difficulty::Hard,
    "advanced" => Difficulty::Hard,
    "expert" => Difficulty::Hard,
};

/// 辩论难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DIFFICULTY_ALIASES
            .get(s.trim().to_lowercase().as_str())
            .copied()
            .ok_or_else(|| ValidationError::InvalidDifficulty {
                value: s.to_string(),
            })
    }
}

macro_rules! impl_display_by_name {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.name())
                }
            }
        )*
    };
}

impl_display_by_name!(Stance, ExpertiseLevel, Difficulty);

// 反序列化与 FromStr 共用同一套别名和大小写规则
macro_rules! impl_try_from_string {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = ValidationError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }
        )*
    };
}

impl_try_from_string!(Stance, ExpertiseLevel, Difficulty);

/// 回复模式，每次调用时由评委开关决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// 作为对手生成有说服力的辩论回复
    Debate,
    /// 作为评委提问或给出建设性反馈
    Judge,
}

impl ResponseMode {
    pub fn from_judge_flag(judge_mode: bool) -> Self {
        if judge_mode {
            ResponseMode::Judge
        } else {
            ResponseMode::Debate
        }
    }
}

/// 一场辩论的配置
///
/// 会话开始后不可变；评委开关在会话中另行维护，这里只是初始值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateConfiguration {
    pub topic: String,
    pub stance: Stance,
    pub expertise_level: ExpertiseLevel,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub judge_mode: bool,
}

impl DebateConfiguration {
    pub fn new(
        topic: impl Into<String>,
        stance: Stance,
        expertise_level: ExpertiseLevel,
        difficulty: Difficulty,
        judge_mode: bool,
    ) -> Self {
        Self {
            topic: topic.into(),
            stance,
            expertise_level,
            difficulty,
            judge_mode,
        }
    }

    /// 会话标题
    pub fn title(&self) -> String {
        format!("辩题: {}", self.topic)
    }

    /// 会话描述
    pub fn description(&self) -> String {
        format!(
            "立场: {}, 专业水平: {}, 难度: {}",
            self.stance, self.expertise_level, self.difficulty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stance_parse_is_case_insensitive() {
        assert_eq!("FOR".parse::<Stance>().unwrap(), Stance::For);
        assert_eq!(" against ".parse::<Stance>().unwrap(), Stance::Against);
        assert!(matches!(
            "maybe".parse::<Stance>(),
            Err(ValidationError::InvalidStance { .. })
        ));
    }

    #[test]
    fn test_expertise_aliases() {
        assert_eq!("Beginner".parse::<ExpertiseLevel>().unwrap(), ExpertiseLevel::School);
        assert_eq!("college".parse::<ExpertiseLevel>().unwrap(), ExpertiseLevel::Undergraduate);
        assert_eq!("PhD".parse::<ExpertiseLevel>().unwrap(), ExpertiseLevel::Phd);
        assert!("kindergarten".parse::<ExpertiseLevel>().is_err());
    }

    #[test]
    fn test_difficulty_aliases() {
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("intermediate".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_deserialize_accepts_aliases_and_serializes_canonical() {
        let config: DebateConfiguration = serde_json::from_str(
            r#"{"topic":"UBI","stance":"Con","expertise_level":"Ph.D.","difficulty":"Intermediate"}"#,
        )
        .unwrap();
        assert_eq!(config.stance, Stance::Against);
        assert_eq!(config.expertise_level, ExpertiseLevel::Phd);
        assert_eq!(config.difficulty, Difficulty::Medium);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""stance":"against""#));
        assert!(json.contains(r#""expertise_level":"phd""#));
    }

    #[test]
    fn test_header_lines() {
        let config = DebateConfiguration::new(
            "Nuclear energy",
            Stance::For,
            ExpertiseLevel::Undergraduate,
            Difficulty::Medium,
            false,
        );
        assert_eq!(config.title(), "辩题: Nuclear energy");
        assert_eq!(
            config.description(),
            "立场: for, 专业水平: undergraduate, 难度: medium"
        );
    }
}
