use clap::Parser;
use cli::{Cli, Commands};
use config::JobConfig;
use error::{NfoTweakerError, Result};
use matcher::types::{MatchStrategy, NfoField};
use nfo_tweaker::{catalog, cli, config, error, matcher, review, scanner, writer};
use review::ConsoleReviewer;
use scanner::keys::KeyPatterns;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fix {
            root,
            catalog: catalog_path,
            strategy,
            suffix,
            config,
            info_dir,
            review_only,
        } => {
            println!("🛠 nfo-tweaker - メタデータ修復\n");

            let config = JobConfig::load(config.as_deref())?;
            let patterns = KeyPatterns::from_config(&config)?;

            // 1. カタログ読み込み
            println!("[1/5] カタログを読み込み中...");
            let records = catalog::load_catalog(&catalog_path, &config.columns)?;
            println!("✔ {}件のレコードを読み込み\n", records.len());

            // 2. NFO走査
            println!("[2/5] NFOをスキャン中...");
            let targets =
                scanner::scan_targets(&root, &suffix, &config.fix_exclude, strategy, &patterns)?;
            println!("✔ {}件のNFOを検出\n", targets.len());

            if targets.is_empty() {
                return Err(NfoTweakerError::NoTargetsFound(root.display().to_string()));
            }

            // 3. 照合
            println!("[3/5] カタログと照合中...");
            let outcome = matcher::match_targets(&targets, &records);
            for collision in &outcome.collisions {
                println!(
                    "⚠ {}: キー{}にレコード{}と{}が重複一致（先勝ちで{}を採用）",
                    collision.filename,
                    collision.key,
                    collision.kept_id,
                    collision.duplicate_id,
                    collision.kept_id
                );
            }
            println!("✔ 照合完了\n");

            // 4. レビューと選別
            println!("[4/5] 候補を選別中...");
            let mut candidates = outcome.candidates;
            if strategy == MatchStrategy::Title {
                review::confirm_matches(&mut candidates, &mut ConsoleReviewer)?;
            }
            let (mut retained, declined) = review::partition(candidates, strategy);

            let log_path = review::write_rejection_log(&declined, &info_dir)?;
            println!("✔ 却下{}件を記録: {}", declined.len(), log_path.display());

            if review_only {
                review::attach_snapshots(&mut retained);
            }

            let changeset_path = review::changeset::save_changeset(&retained, &info_dir)?;
            println!(
                "✔ 変更セット{}件を保存: {}\n",
                retained.len(),
                changeset_path.display()
            );

            if review_only {
                println!("レビュー専用モードのため書き込みは行いません。");
                println!("内容を確認・編集後、次のコマンドで再開できます:");
                println!("  nfo-tweaker resume \"{}\"", changeset_path.display());
                return Ok(());
            }

            // 5. 書き込み
            println!("[5/5] NFOを書き換え中...");
            let summary = writer::apply_changeset(&retained, config.backup, cli.verbose)?;
            print_summary(&summary);
        }

        Commands::Resume { changeset, config } => {
            println!("🛠 nfo-tweaker - 再開\n");

            let config = JobConfig::load(config.as_deref())?;

            println!("[1/2] 変更セットを読み込み中...");
            let entries = review::changeset::load_changeset(&changeset)?;
            println!("✔ {}件を読み込み\n", entries.len());

            println!("[2/2] NFOを書き換え中...");
            let summary = writer::apply_changeset(&entries, config.backup, cli.verbose)?;
            print_summary(&summary);
        }

        Commands::Trim {
            root,
            suffix,
            config,
            dry_run,
        } => {
            println!("✂ nfo-tweaker - タイトル整形\n");

            let config = JobConfig::load(config.as_deref())?;
            let patterns = KeyPatterns::from_config(&config)?;

            println!("[1/2] NFOをスキャン中...");
            let targets = scanner::scan_targets(
                &root,
                &suffix,
                &config.trim_exclude,
                MatchStrategy::Title,
                &patterns,
            )?;
            println!("✔ {}件のNFOを検出\n", targets.len());

            if targets.is_empty() {
                return Err(NfoTweakerError::NoTargetsFound(root.display().to_string()));
            }

            // 整形タイトル = タイトルキー + 付加語
            let entries: Vec<_> = targets
                .iter()
                .map(|target| {
                    matcher::title_candidate(target, &format!("{}{}", target.key, config.append))
                })
                .collect();

            if dry_run {
                println!("[2/2] プレビュー（書き込みなし）");
                for entry in &entries {
                    println!(
                        "  {} → {}",
                        entry.filename,
                        entry.fields.get(NfoField::Title).unwrap_or("(空)")
                    );
                }
                return Ok(());
            }

            println!("[2/2] タイトルを書き換え中...");
            let summary = writer::apply_changeset(&entries, config.backup, cli.verbose)?;
            print_summary(&summary);
        }
    }

    Ok(())
}

fn print_summary(summary: &writer::WriteSummary) {
    println!(
        "\n✅ 完了: {}ファイル更新（{}フィールド書き換え、{}フィールド対象なし）",
        summary.files, summary.fields_updated, summary.fields_absent
    );
}
