// seating-chart: YAML configuration model

use ::image::Rgb;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::AppError;

// ============================================================================
// Colors
// ============================================================================

/// `#RRGGBB` color from the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub Rgb<u8>);

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let hex_str = s.trim().trim_start_matches('#');
        if hex_str.len() != 6 {
            return Err(format!("invalid color: {}", s));
        }
        let bytes = hex::decode(hex_str).map_err(|_| format!("invalid color: {}", s))?;
        Ok(Color(Rgb([bytes[0], bytes[1], bytes[2]])))
    }
}

// ============================================================================
// Config Structures
// ============================================================================

/// One labeled box inside a student desk (number, kana or name)
#[derive(Debug, Clone, Deserialize)]
pub struct TextBoxConfig {
    pub box_sz_y: u32,
    pub fill_clr: Color,
    pub outline_clr: Color,
    pub txt_clr: Color,
    pub font_pt: f32,
    #[serde(default)]
    pub txt_offset_x: i32,
    #[serde(default)]
    pub txt_offset_y: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentDeskConfig {
    pub padding_x: u32,
    pub padding_y: u32,
    /// Box width shared by all three rows
    pub sz_x: u32,
    pub student_num: TextBoxConfig,
    pub kana: TextBoxConfig,
    pub name: TextBoxConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeacherDeskConfig {
    pub sz_x: u32,
    pub sz_y: u32,
    /// Space above and below the desk inside the teacher band
    #[serde(default)]
    pub padding_y: u32,
    pub fill_clr: Color,
    pub outline_clr: Color,
    pub txt_clr: Color,
    pub font_pt: f32,
    #[serde(default)]
    pub text: String,
}

/// Free-standing text drawn in the teacher band (title, start date)
#[derive(Debug, Clone, Deserialize)]
pub struct LabelConfig {
    #[serde(default)]
    pub text: String,
    pub font_pt: f32,
    pub txt_clr: Color,
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub font_path: PathBuf,
    pub names_path: PathBuf,
    pub layout_path: PathBuf,
    pub output_path: PathBuf,
    #[serde(default)]
    pub seed: Option<u64>,
    pub back_clr: Color,
    pub student_desk: StudentDeskConfig,
    pub teacher_desk: TeacherDeskConfig,
    pub title: LabelConfig,
    pub start_date: LabelConfig,
}

// ============================================================================
// Loading
// ============================================================================

impl ChartConfig {
    /// Read and validate a config file; relative paths resolve against its directory.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_yaml(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.font_path = resolve(base, &config.font_path);
        config.names_path = resolve(base, &config.names_path);
        config.layout_path = resolve(base, &config.layout_path);
        config.output_path = resolve(base, &config.output_path);

        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, AppError> {
        let config: ChartConfig = serde_yaml::from_str(content)
            .map_err(|e| AppError::ConfigError(format!("Invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        let desk = &self.student_desk;
        if desk.sz_x == 0 {
            return Err(AppError::ConfigError("student_desk.sz_x must be positive".into()));
        }
        for (key, text_box) in [
            ("student_num", &desk.student_num),
            ("kana", &desk.kana),
            ("name", &desk.name),
        ] {
            if text_box.box_sz_y == 0 {
                return Err(AppError::ConfigError(format!(
                    "student_desk.{}.box_sz_y must be positive",
                    key
                )));
            }
            if text_box.font_pt <= 0.0 {
                return Err(AppError::ConfigError(format!(
                    "student_desk.{}.font_pt must be positive",
                    key
                )));
            }
        }
        for (key, font_pt) in [
            ("teacher_desk", self.teacher_desk.font_pt),
            ("title", self.title.font_pt),
            ("start_date", self.start_date.font_pt),
        ] {
            if font_pt <= 0.0 {
                return Err(AppError::ConfigError(format!("{}.font_pt must be positive", key)));
            }
        }
        Ok(())
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_YAML: &str = r##"
font_path: fonts/NotoSansJP-Regular.ttf
names_path: data/names.csv
layout_path: data/layout.csv
output_path: output/seating.png
seed: 42
back_clr: "#FFFFFF"
student_desk:
  padding_x: 10
  padding_y: 8
  sz_x: 120
  student_num:
    box_sz_y: 20
    fill_clr: "#EEEEEE"
    outline_clr: "#000000"
    txt_clr: "#333333"
    font_pt: 14
    txt_offset_x: 4
    txt_offset_y: 2
  kana:
    box_sz_y: 20
    fill_clr: "#FFFFFF"
    outline_clr: "#000000"
    txt_clr: "#333333"
    font_pt: 12
  name:
    box_sz_y: 40
    fill_clr: "#FFFFFF"
    outline_clr: "#000000"
    txt_clr: "#000000"
    font_pt: 24
    txt_offset_x: 4
    txt_offset_y: 6
teacher_desk:
  sz_x: 200
  sz_y: 60
  padding_y: 20
  fill_clr: "#CCCCCC"
  outline_clr: "#000000"
  txt_clr: "#000000"
  font_pt: 24
  text: Teacher
title:
  text: Class 1-A
  font_pt: 28
  txt_clr: "#000000"
  offset_x: 10
  offset_y: 10
start_date:
  text: ""
  font_pt: 16
  txt_clr: "#555555"
  offset_x: 10
  offset_y: 50
"##;

    #[test]
    fn parses_sample_config() {
        let config = ChartConfig::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.back_clr, Color(Rgb([255, 255, 255])));
        assert_eq!(config.student_desk.name.box_sz_y, 40);
        assert_eq!(config.student_desk.kana.txt_offset_x, 0);
        assert_eq!(config.teacher_desk.text, "Teacher");
        assert!(config.start_date.text.is_empty());
    }

    #[test]
    fn seed_is_optional() {
        let yaml = SAMPLE_YAML.replace("seed: 42\n", "");
        let config = ChartConfig::from_yaml(&yaml).unwrap();
        assert_eq!(config.seed, None);

        let yaml = SAMPLE_YAML.replace("seed: 42", "seed: null");
        let config = ChartConfig::from_yaml(&yaml).unwrap();
        assert_eq!(config.seed, None);
    }

    #[test]
    fn rejects_bad_color() {
        let yaml = SAMPLE_YAML.replace("back_clr: \"#FFFFFF\"", "back_clr: \"#FFF\"");
        let err = ChartConfig::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("invalid color"));
    }

    #[test]
    fn rejects_zero_box_height() {
        let yaml = SAMPLE_YAML.replace("box_sz_y: 40", "box_sz_y: 0");
        let err = ChartConfig::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("student_desk.name.box_sz_y"));
    }

    #[test]
    fn color_parsing_accepts_lowercase_and_no_hash() {
        assert_eq!(
            Color::try_from("a0b1c2".to_string()).unwrap(),
            Color(Rgb([0xa0, 0xb1, 0xc2]))
        );
        assert!(Color::try_from("#GG0000".to_string()).is_err());
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        assert_eq!(
            resolve(Path::new("/srv/chart"), Path::new("data/names.csv")),
            PathBuf::from("/srv/chart/data/names.csv")
        );
        assert_eq!(
            resolve(Path::new("/srv/chart"), Path::new("/tmp/out.png")),
            PathBuf::from("/tmp/out.png")
        );
    }
}
