#![doc = r#"
# issi-tck

## 章节定位（Why）
- **目标**：为 P25 ISSI 消息体编解码器与其依赖的 SDP 读写器提供一组可复用的兼容性断言，
  任何实现改动都在各自 crate 的 `tests/tck.rs` 中被立即回归。
- **当前阶段**：覆盖消息体的往返、默认省略与分帧，一致性比对的典型场景，服务档案的字段语义，
  以及以 JSON 黄金向量描述的线上报文。

## 结构概览（How）
- `body::roundtrip`：渲染与解析的契约；
- `body::matching`：单向一致性比对的契约；
- `body::profile`：用户/组服务档案的字段与默认值契约；
- `body::golden`：加载 `vectors/conformance_cases.json` 并逐条校验；
- `sdp`：ISSI 负载常见 SDP 的解析与规范化契约。

## 使用约定（What）
- 无返回值的断言失败即 panic；返回 `anyhow::Result` 的断言以错误上下文描述失败位置；
- 调用方可先执行 [`init_test_logging`]，以 `RUST_LOG` 控制断言过程中的日志输出。
"#]

use tracing_subscriber::EnvFilter;

pub mod body;
pub mod sdp;

/// 初始化测试日志。
///
/// # 教案式说明
/// - **意图（Why）**：TCK 断言经常在多个测试二进制中被调用，需要一个幂等的日志入口；
/// - **契约（What）**：默认过滤级别为 `info`，可被 `RUST_LOG` 覆盖；重复调用不会 panic；
/// - **实现（How）**：使用 `try_init`，已有全局订阅者时静默返回。
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
