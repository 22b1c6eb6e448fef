//! System instruction for the retrieval-augmented provider
//!
//! The instruction encodes a two-stage judging protocol. Stage 0 decides
//! whether the input is checkable at all; stage 1 emits a verdict marker
//! on the first line followed by a bulleted rationale. Verdict parsing in
//! [`super::verdict`] depends on the markers fixed here.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Phrase the not-applicable reason line always contains
pub const NOT_APPLICABLE_PHRASE: &str = "ファクトチェック対象外";

/// Which applicability filter the instruction applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptVariant {
    /// Any objectively checkable factual claim
    Standard,
    /// Only claims critical of the configured subject
    Critical,
}

impl Default for PromptVariant {
    fn default() -> Self {
        Self::Standard
    }
}

impl FromStr for PromptVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "standard" => Ok(Self::Standard),
            "critical" => Ok(Self::Critical),
            _ => Err(ConfigError::InvalidSetting {
                name: "FACT_CHECKER_PROMPT",
                value: s.to_string(),
            }),
        }
    }
}

const HEADER: &str = "\
あなたは厳格なファクトチェッカーです。
以下の手順と書式だけを守り、日本語で簡潔に回答してください。
（指示にないことは書かないこと）
";

const STAGE_0: &str = "
────────────────────────────────
▼ステップ 0 : 対象判定（事前フィルタ）
  ❶ 入力テキストが「客観的に検証可能な事実命題」か確認せよ。
{critical_rule}  ❷ 以下のいずれかに該当する場合は{not_applicable}とし、
      次の書式で即座に終了すること：
        OK
        入力文は○○のため{not_applicable}。
      （○○には一行で理由を書く。出典は不要）

  ★{not_applicable}リスト
    ・感想／意見／価値判断／予測／願望／比喩／誇張
    ・固有名詞そのもの（人名・地名・組織名・商品名・ブランド名 等）
    ・連絡先や識別情報（URL, メールアドレス, 電話番号, SNS ID 等）
    ・個人の経歴・肩書・受賞歴など履歴情報
    ・検証可能な公開データソースが存在しない内容
{critical_item}";

const CRITICAL_RULE: &str = "\
  ❶' 入力テキストが「{subject}」に対する批判・否定的な主張か確認せよ。
";

const CRITICAL_ITEM: &str = "\
    ・「{subject}」に対する批判・否定的な主張ではないもの（称賛・応援・中立的な言及）
";

const STAGE_1: &str = "
────────────────────────────────
▼ステップ 1 : 真偽判定（ステップ 0 を通過した場合のみ）
  ❶ データソースで裏付けを取り、最上部に以下いずれかを記載
        OK : データソースと完全一致
        NG : データソースと矛盾（誤りあり）
        OK : データ不足で判定不能

  ❷ 判定根拠を箇条書き（簡潔に）。
  ❸ 引用箇所（節・ページ・タイムスタンプ等）を箇条書き。
  ❹ 最後に出典（URL／書誌情報）。
  ❺ NG の場合のみ、正しい情報を一文で示す。

  ★追加ルール
    ・表記揺れ（漢字⇔ひらがな、略称、旧字体など）による
      固有名詞の差異は誤りとみなさない。
      ─ 例：「安野貴博」と「安野たかひろ」は同一人物扱い。
      ─ 誤字脱字のみを指摘する用途ではないことに注意。
    ・固有名詞の綴りが異なること「だけ」を理由に NG 判定を出さない。
      内容面の食い違いがある場合のみ NG とする。
";

const OUTPUT_FORMAT: &str = "
────────────────────────────────
▼出力フォーマット例

OK
- 根拠: …
- 該当箇所: …
- 出典: …

NG
- 誤り: …
- 正しい情報: …
- 出典: …

OK
入力文は主観的感想であり客観的事実ではないため。
────────────────────────────────
";

/// Build the system instruction for a variant
///
/// `subject` is only used by [`PromptVariant::Critical`].
pub fn system_instruction(variant: PromptVariant, subject: &str) -> String {
    let (rule, item) = match variant {
        PromptVariant::Standard => (String::new(), String::new()),
        PromptVariant::Critical => (
            CRITICAL_RULE.replace("{subject}", subject),
            CRITICAL_ITEM.replace("{subject}", subject),
        ),
    };

    let stage_0 = STAGE_0
        .replace("{critical_rule}", &rule)
        .replace("{critical_item}", &item)
        .replace("{not_applicable}", NOT_APPLICABLE_PHRASE);

    let mut instruction = String::with_capacity(
        HEADER.len() + stage_0.len() + STAGE_1.len() + OUTPUT_FORMAT.len(),
    );
    instruction.push_str(HEADER);
    instruction.push_str(&stage_0);
    instruction.push_str(STAGE_1);
    instruction.push_str(OUTPUT_FORMAT);
    instruction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_instruction_has_both_stages() {
        let text = system_instruction(PromptVariant::Standard, "チームみらい");
        assert!(text.contains("ステップ 0"));
        assert!(text.contains("ステップ 1"));
        assert!(text.contains(NOT_APPLICABLE_PHRASE));
        assert!(!text.contains("チームみらい"));
        assert!(!text.contains("{critical"));
        assert!(!text.contains("{not_applicable}"));
        assert!(text.contains(&format!("入力文は○○のため{}。", NOT_APPLICABLE_PHRASE)));
    }

    #[test]
    fn test_critical_instruction_names_subject() {
        let text = system_instruction(PromptVariant::Critical, "チームみらい");
        assert!(text.contains("「チームみらい」に対する批判"));
        assert!(!text.contains("{subject}"));
    }

    #[test]
    fn test_instruction_fixes_verdict_markers() {
        let text = system_instruction(PromptVariant::Standard, "");
        assert!(text.contains("NG : データソースと矛盾"));
        assert!(text.contains("OK : データ不足で判定不能"));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("".parse::<PromptVariant>().unwrap(), PromptVariant::Standard);
        assert_eq!("critical".parse::<PromptVariant>().unwrap(), PromptVariant::Critical);
        assert!("strict".parse::<PromptVariant>().is_err());
    }
}
