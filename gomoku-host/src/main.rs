use anyhow::Result;
use gomoku_ai::AiEngine;
use gomoku_core::{GameRecord, Notation, Player};
use gomoku_host::{Session, StorageManager};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("gomoku_host=debug".parse()?))
        .init();

    info!("五子棋自对弈启动中...");

    let storage = StorageManager::new()?;
    let mut settings = storage.load_settings()?;
    settings.ai.enabled = true;
    info!(
        "棋盘 {}x{}，{} 子连线，AI {} / {}",
        settings.game.board_size,
        settings.game.board_size,
        settings.game.win_condition,
        settings.ai.difficulty.display_name(),
        settings.ai.evaluation_style.display_name()
    );

    let mut session = Session::new(&settings)?;

    // 另一方同样由 AI 驱动，通过人类接口落子
    let opponent = settings.ai.with_player(settings.ai.player.opponent());
    let opponent_engine = AiEngine::from_ai_config(&opponent, settings.game.win_condition);

    while session.game().is_active() {
        let played = if session.is_ai_turn() {
            session.play_ai_turn().await
        } else {
            let player = session.game().current_player();
            match opponent_engine
                .select_move_async(session.game().board().clone(), player)
                .await
            {
                Some(mv) if session.play_human(mv.row, mv.col) => Some(mv),
                _ => None,
            }
        };

        if played.is_none() {
            warn!("没有可落的子，提前结束");
            break;
        }
    }

    info!("最终局面:\n{}", Notation::format(session.game().board()));
    match session.game().winner() {
        Some(winner) => info!(
            "{} 获胜，共 {} 手",
            winner.display_name(),
            session.game().history().len()
        ),
        None => info!("对局结束，无胜者"),
    }

    let seat_name = |player: Player| {
        let config = if player == settings.ai.player { &settings.ai } else { &opponent };
        format!("AI-{}", config.difficulty.display_name())
    };
    let mut record = GameRecord::from_game(
        session.game(),
        seat_name(Player::Black),
        seat_name(Player::White),
    );
    record.set_ai_difficulty(settings.ai.difficulty.display_name());
    let record_id = storage.save_record(&record)?;
    info!("棋谱已保存: {}", record_id);

    Ok(())
}
