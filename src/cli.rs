use crate::preprocess::PreprocessMethod;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "namae-ocr")]
#[command(about = "ポイント履歴スクリーンショットのOCR・名前補正・CSV出力ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像フォルダからレコードを抽出してCSVを出力
    Extract {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力CSVファイル（デフォルト: ./output.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 名前テーブルのディレクトリ（デフォルト: 設定の table_dir）
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// 前処理方式 (none/enhance/basic/adaptive/otsu)
        #[arg(short, long, default_value = "enhance")]
        preprocess: PreprocessMethod,

        /// 近似一致の閾値（0-100）
        #[arg(long)]
        threshold: Option<u8>,

        /// レコードを画像順のまま出力（デフォルトは逆順）
        #[arg(long)]
        keep_order: bool,

        /// OCRテキストを保存するディレクトリ（<画像ファイル名>.txt）
        #[arg(long)]
        dump_text: Option<PathBuf>,

        /// 並列数（省略時はCPU数）
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// 名前断片を補正結果に変換して表示
    Resolve {
        /// 名前断片
        #[arg(required = true)]
        names: Vec<String>,

        /// 名前テーブルのディレクトリ
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// 近似一致の閾値（0-100）
        #[arg(long)]
        threshold: Option<u8>,
    },

    /// 1枚の画像でOCR精度を評価
    Evaluate {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 期待テキストJSON（{"expected_texts": [...]}）
        #[arg(short, long)]
        expected: PathBuf,

        /// 前処理方式 (none/enhance/basic/adaptive/otsu)
        #[arg(short, long, default_value = "none")]
        preprocess: PreprocessMethod,
    },

    /// Tesseractの動作確認
    Check,

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// tesseract実行ファイルを設定
        #[arg(long)]
        set_tesseract_cmd: Option<String>,

        /// TESSDATA_PREFIXを設定
        #[arg(long)]
        set_tessdata_prefix: Option<PathBuf>,

        /// 近似一致の閾値を設定（0-100）
        #[arg(long)]
        set_threshold: Option<u8>,
    },
}
