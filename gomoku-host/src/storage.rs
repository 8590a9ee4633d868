//! 设置与棋谱存储
//!
//! 目录结构：
//! - `<数据目录>/gomoku/settings.json`
//! - `<数据目录>/gomoku/records/*.json`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gomoku_core::{GameOutcome, GameRecord};

use crate::settings::Settings;

const SETTINGS_FILE: &str = "settings.json";
const RECORDS_DIR: &str = "records";

/// 存储管理器
pub struct StorageManager {
    root: PathBuf,
}

impl StorageManager {
    /// 在平台数据目录下创建存储管理器
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir().context("无法获取应用数据目录")?;
        Self::with_root(data_dir.join("gomoku"))
    }

    /// 在指定目录下创建存储管理器
    pub fn with_root(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let records_dir = root.join(RECORDS_DIR);
        if !records_dir.exists() {
            fs::create_dir_all(&records_dir)
                .with_context(|| format!("无法创建存储目录: {:?}", records_dir))?;
        }
        Ok(Self { root })
    }

    /// 获取存储根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn records_dir(&self) -> PathBuf {
        self.root.join(RECORDS_DIR)
    }

    /// 加载设置，文件不存在时返回默认设置
    pub fn load_settings(&self) -> Result<Settings> {
        let path = self.root.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("读取设置失败: {:?}", path))?;
        Settings::from_json(&content).context("解析设置文件失败")
    }

    /// 保存设置
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let path = self.root.join(SETTINGS_FILE);
        let content = settings.to_json().context("序列化设置失败")?;
        fs::write(&path, content).with_context(|| format!("写入设置失败: {:?}", path))
    }

    /// 保存棋谱，返回文件名
    pub fn save_record(&self, record: &GameRecord) -> Result<String> {
        let filename = generate_filename(
            &Utc::now(),
            &record.metadata.black_player,
            &record.metadata.white_player,
        );
        let filepath = self.records_dir().join(&filename);

        let content = record.to_json().context("序列化棋谱失败")?;
        fs::write(&filepath, content)
            .with_context(|| format!("写入文件失败: {:?}", filepath))?;

        Ok(filename)
    }

    /// 加载棋谱
    pub fn load_record(&self, record_id: &str) -> Result<GameRecord> {
        let filepath = self.records_dir().join(record_id);
        if !filepath.exists() {
            anyhow::bail!("棋谱文件不存在: {}", record_id);
        }

        let content = fs::read_to_string(&filepath)
            .with_context(|| format!("读取文件失败: {:?}", filepath))?;
        GameRecord::from_json(&content).context("解析棋谱文件失败")
    }

    /// 列出所有棋谱（最新保存的在前）
    pub fn list_records(&self) -> Result<Vec<SavedRecordInfo>> {
        let mut records = Vec::new();
        let records_dir = self.records_dir();
        if !records_dir.exists() {
            return Ok(records);
        }

        let entries = fs::read_dir(&records_dir)
            .with_context(|| format!("读取存储目录失败: {:?}", records_dir))?;

        for entry in entries {
            let entry = entry.context("读取目录项失败")?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            // 跳过损坏的文件
            let Ok(record) = self.load_record(filename) else {
                tracing::warn!("跳过无法解析的棋谱: {}", filename);
                continue;
            };

            let saved_at = entry
                .metadata()
                .and_then(|m| m.modified())
                .map(DateTime::from)
                .unwrap_or_else(|_| Utc::now());

            records.push(SavedRecordInfo {
                record_id: filename.to_string(),
                black_player: record.metadata.black_player,
                white_player: record.metadata.white_player,
                saved_at,
                move_count: record.moves.len(),
                result: record.metadata.result,
            });
        }

        records.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(records)
    }

    /// 删除棋谱
    pub fn delete_record(&self, record_id: &str) -> Result<()> {
        let filepath = self.records_dir().join(record_id);
        if filepath.exists() {
            fs::remove_file(&filepath)
                .with_context(|| format!("删除文件失败: {:?}", filepath))?;
        }
        Ok(())
    }
}

/// 保存的棋谱信息
#[derive(Debug, Clone)]
pub struct SavedRecordInfo {
    /// 棋谱 ID（文件名）
    pub record_id: String,
    pub black_player: String,
    pub white_player: String,
    pub saved_at: DateTime<Utc>,
    pub move_count: usize,
    pub result: Option<GameOutcome>,
}

/// 生成文件名
fn generate_filename(timestamp: &DateTime<Utc>, black_player: &str, white_player: &str) -> String {
    format!(
        "{}_{}vs{}.json",
        timestamp.format("%Y%m%d_%H%M%S"),
        sanitize_filename(black_player),
        sanitize_filename(white_player)
    )
}

/// 清理文件名中的特殊字符
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
