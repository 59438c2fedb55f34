use super::{ client::RelayClient, prefers_dark, ChatView, Palette };
use crate::cli::ChatArgs;
use crate::models::chat::Message;
use std::error::Error;
use std::io::{ self, Write };
use tokio::io::{ AsyncBufReadExt, BufReader };
use log::info;

const BUBBLE_INDENT: usize = 6;

pub fn render_header(palette: &Palette) -> String {
    format!(
        "{} Solace Chatbot {}\n{}Professional assistance whenever you need it. :theme toggles colors, :quit leaves.{}\n",
        palette.header,
        palette.reset,
        palette.muted,
        palette.reset
    )
}

pub fn render_welcome(palette: &Palette) -> String {
    format!(
        "\n{}Welcome to Solace Support\nHow can we assist you today?{}\n",
        palette.muted,
        palette.reset
    )
}

/// One bubble: avatar, text, then the timestamp on its own muted line.
pub fn render_message(message: &Message, palette: &Palette) -> String {
    let (avatar, style) = if message.is_user {
        ("U", palette.user_bubble)
    } else {
        ("S", palette.bot_bubble)
    };
    let indent = " ".repeat(BUBBLE_INDENT);
    let body = message.text.lines().collect::<Vec<_>>().join(&format!("\n{}", indent));
    format!(
        "[{}]  {} {} {}\n{}{}{}{}\n",
        avatar,
        style,
        body,
        palette.reset,
        indent,
        palette.muted,
        message.timestamp,
        palette.reset
    )
}

fn print_flush(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}

pub async fn run(args: ChatArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let dark_mode = if args.dark { true } else if args.light { false } else { prefers_dark() };
    let mut view = ChatView::new(dark_mode);
    let client = RelayClient::new(&args.relay_url);
    info!("Chatting with relay at {}", client.chat_url());

    let palette = view.theme().palette();
    print_flush(&render_header(&palette))?;
    print_flush(&render_welcome(&palette))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_flush("\nYou> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            ":quit" | ":exit" => {
                break;
            }
            ":theme" => {
                let palette = view.toggle_theme().palette();
                print_flush(&render_header(&palette))?;
                continue;
            }
            _ => {}
        }

        view.set_input(line);
        let Some(text) = view.submit() else {
            continue;
        };
        let palette = view.theme().palette();
        if let Some(last) = view.messages().last() {
            print_flush(&render_message(last, &palette))?;
        }
        print_flush(&format!("{}Solace is typing...{}\n", palette.muted, palette.reset))?;

        let result = client.send(&text, view.session_id()).await;
        view.receive(result);
        if let Some(last) = view.messages().last() {
            print_flush(&render_message(last, &palette))?;
        }
    }

    print_flush("\nSolace Chatbot - take care.\n")?;
    Ok(())
}
