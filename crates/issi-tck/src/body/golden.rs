//! JSON 黄金向量。
//!
//! ## 设计意图（Why）
//! - 以数据描述线上报文，新增互通问题时只需追加一条向量，而不必改动断言代码；
//! - 向量文件在编译期嵌入，测试不依赖运行目录。
//!
//! ## 向量格式（What）
//! - `decode`：给定 Content-Type 与正文，期望按顺序得到的部分种类，或期望被拒绝；
//! - `conformance`：给定参考与捕获两份报文，期望的比对结论与未满足部分的种类。

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use issi_codec_body::{BodyCodec, ContentList, ContentPart};

const CASES: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/vectors/conformance_cases.json"
));

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Suite {
    decode: Vec<DecodeCase>,
    conformance: Vec<ConformanceCase>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireBody {
    content_type: String,
    body: String,
}

impl WireBody {
    fn decode(&self, codec: &BodyCodec) -> anyhow::Result<ContentList> {
        codec
            .decode(&self.content_type, self.body.as_bytes())
            .with_context(|| format!("decoding `{}` body", self.content_type))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DecodeCase {
    name: String,
    input: WireBody,
    #[serde(default)]
    kinds: Vec<String>,
    #[serde(default)]
    rejected: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConformanceCase {
    name: String,
    reference: WireBody,
    captured: WireBody,
    conformant: bool,
    #[serde(default)]
    unmatched: Option<String>,
}

fn load() -> anyhow::Result<Suite> {
    serde_json::from_str(CASES).context("parsing vectors/conformance_cases.json")
}

fn kinds_of(list: &ContentList) -> Vec<String> {
    list.iter().map(|part| part.kind().to_string()).collect()
}

/// 逐条校验解析向量。
///
/// # 教案式说明
/// - **流程（How）**：对每条向量执行解析；期望拒绝的向量必须返回错误，其余向量的部分种类
///   必须与记录一致，并且重新渲染后再次解析得到相同列表；
/// - **契约（What）**：第一条失败的向量以其名称作为错误上下文返回。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_decode_vectors() -> anyhow::Result<()> {
    let suite = load()?;
    let codec = BodyCodec::default();
    for case in &suite.decode {
        let outcome = case.input.decode(&codec);
        if case.rejected {
            anyhow::ensure!(outcome.is_err(), "vector `{}` should be rejected", case.name);
            continue;
        }
        let list = outcome.with_context(|| format!("vector `{}`", case.name))?;
        anyhow::ensure!(
            kinds_of(&list) == case.kinds,
            "vector `{}` decoded to {:?}",
            case.name,
            kinds_of(&list)
        );

        let encoded = codec.encode(&list);
        let reparsed = match encoded.content_type_header() {
            Some(header) => codec.decode(&header, encoded.text.as_bytes())?,
            None => ContentList::empty(),
        };
        anyhow::ensure!(
            reparsed.render() == list.render(),
            "vector `{}` does not re-render stably",
            case.name
        );
        info!(vector = %case.name, parts = list.len(), "decode vector passed");
    }
    Ok(())
}

/// 逐条校验一致性比对向量。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_conformance_vectors() -> anyhow::Result<()> {
    let suite = load()?;
    let codec = BodyCodec::default();
    for case in &suite.conformance {
        let reference = case
            .reference
            .decode(&codec)
            .with_context(|| format!("reference of `{}`", case.name))?;
        let captured = case
            .captured
            .decode(&codec)
            .with_context(|| format!("captured of `{}`", case.name))?;

        let verdict = codec.verify(&reference, &captured);
        anyhow::ensure!(
            verdict.is_conformant() == case.conformant,
            "vector `{}` expected conformant={}",
            case.name,
            case.conformant
        );
        let unmatched = verdict.unmatched().map(|part: &ContentPart| part.kind().to_string());
        anyhow::ensure!(
            unmatched == case.unmatched,
            "vector `{}` reported {:?} as unmatched",
            case.name,
            unmatched
        );
        info!(vector = %case.name, conformant = case.conformant, "conformance vector passed");
    }
    Ok(())
}
