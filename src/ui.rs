//! TUI rendering for the place detail screen.
//!
//! This module handles all UI rendering logic using the `ratatui` crate:
//! the detail view (name, rating, info line, images, review sections) and
//! the review composition stub screen.

use crate::app::{App, ReviewDraft, Screen};
use crate::fetcher::FetchOrigin;
use crate::models::Review;
use ratatui::{prelude::*, widgets::*};

/// Renders one frame of the TUI based on current application state.
pub fn render(f: &mut Frame, app: &App) {
    match &app.screen {
        Screen::PlaceDetail => render_detail_view(f, app),
        Screen::ReviewCompose(draft) => render_review_compose(f, draft),
    }
}

/// Detail view: place header, image gallery, review sections, key bar.
fn render_detail_view(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.size());

    render_place_header(f, app, chunks[0]);
    render_image_gallery(f, app, chunks[1]);
    render_review_sections(f, app, chunks[2]);
    render_key_bar(f, chunks[3]);
}

/// Header block: name with bookmark glyph, numeric rating with a star row,
/// and the `distance | industry | address` info line.
fn render_place_header(f: &mut Frame, app: &App, area: Rect) {
    let bookmark = if app.is_bookmarked { "◆" } else { "◇" };
    let name = if app.loading && app.place.name.is_empty() {
        "불러오는 중..."
    } else {
        app.place.name.as_str()
    };

    let header_content = vec![
        Line::from(vec![
            Span::styled(
                format!(" {}", name),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(bookmark, Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::raw(format!(" {}", app.place.rating)),
            Span::raw(" "),
            Span::styled(star_row(app.place.rating), Style::default().fg(Color::Blue)),
        ]),
        Line::from(vec![Span::styled(
            format!(" {}", info_line(app)),
            Style::default().fg(Color::Gray),
        )]),
        Line::from(vec![Span::styled(
            format!(" {}", telemetry_line(app)),
            Style::default().fg(Color::DarkGray),
        )]),
    ];

    let header = Paragraph::new(header_content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(header, area);
}

fn render_image_gallery(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = if app.place.images.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            " 등록된 사진이 없습니다",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.place
            .images
            .iter()
            .map(|url| {
                ListItem::new(Line::from(vec![
                    Span::styled(" ▣ ", Style::default().fg(Color::Magenta)),
                    Span::raw(url.as_str()),
                ]))
            })
            .collect()
    };

    let gallery = List::new(items).block(
        Block::default()
            .title(" 가게 이미지 ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(gallery, area);
}

/// Two review sections side by side: visitor reviews (user-authored) and
/// Google visitor reviews. They are separate partitions and never mix.
fn render_review_sections(f: &mut Frame, app: &App, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let user_lines = if app.user_reviews.is_empty() {
        vec![
            Line::from(" 해당 장소를 방문하셨나요?"),
            Line::from(" 방문인증을 통해 리뷰를 작성하세요!"),
            Line::from(""),
            Line::from(Span::styled(
                " [w] 리뷰 작성",
                Style::default().fg(Color::Cyan),
            )),
        ]
    } else {
        review_lines(&app.user_reviews)
    };

    let user_block = Paragraph::new(user_lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" 방문자 리뷰 ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(user_block, halves[0]);

    let google_lines = if app.google_reviews.is_empty() {
        vec![Line::from(Span::styled(
            " 아직 리뷰가 없습니다",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        review_lines(&app.google_reviews)
    };

    let google_block = Paragraph::new(google_lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" 구글 방문자 리뷰 ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(google_block, halves[1]);
}

fn render_key_bar(f: &mut Frame, area: Rect) {
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(" q ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" 뒤로  "),
        Span::styled(" b ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" 북마크  "),
        Span::styled(" w ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" 리뷰 작성"),
    ]));
    f.render_widget(bar, area);
}

/// Review composition stub. Shows the handed-over draft; submission lives
/// outside this screen.
fn render_review_compose(f: &mut Frame, draft: &ReviewDraft) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.size());

    let content = vec![
        Line::from(vec![
            Span::styled("가게: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(draft.name.as_str()),
        ]),
        Line::from(vec![
            Span::styled("별점: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("{:.1}", draft.rating)),
            Span::raw(" "),
            Span::styled(star_row(draft.rating), Style::default().fg(Color::Blue)),
        ]),
        Line::from(""),
        Line::from(if draft.review_text.is_empty() {
            Span::styled("리뷰 내용을 입력하세요...", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(draft.review_text.as_str())
        }),
    ];

    let form = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" 리뷰 작성 ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(form, chunks[0]);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(" q ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" 돌아가기"),
    ]));
    f.render_widget(bar, chunks[1]);
}

/// Five-star row; stars up to the rounded rating are filled.
fn star_row(rating: f64) -> String {
    let filled = rating.round() as usize;
    (1..=5).map(|i| if i <= filled { '★' } else { '☆' }).collect()
}

/// `distance | industry | address`, skipping empty segments and their bars.
fn info_line(app: &App) -> String {
    let mut segments: Vec<&str> = Vec::new();
    if let Some(distance) = app.place.distance.as_deref() {
        segments.push(distance);
    }
    if let Some(industry) = app.place.industry.as_deref() {
        segments.push(industry);
    }
    if !app.place.address.is_empty() {
        segments.push(&app.place.address);
    }
    segments.join(" | ")
}

fn review_lines(reviews: &[Review]) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for review in reviews {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {}", review.nick),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(star_row(review.rating), Style::default().fg(Color::Blue)),
            Span::raw("  "),
            Span::styled(
                review.created_at.as_str(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        if !review.review_text.is_empty() {
            lines.push(Line::from(format!(" {}", review.review_text)));
        }
        for url in &review.images {
            lines.push(Line::from(vec![
                Span::styled(" ▣ ", Style::default().fg(Color::Magenta)),
                Span::raw(url.as_str()),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines
}

/// One-line fetch telemetry: data origin and freshness.
fn telemetry_line(app: &App) -> String {
    let origin = match app.last_origin {
        Some(FetchOrigin::Remote) => "LIVE",
        Some(FetchOrigin::Bundled) => "BUNDLED",
        Some(FetchOrigin::Missing) => "NO DATA",
        None => "...",
    };
    let seconds_ago = app
        .last_update
        .map(|inst| inst.elapsed().as_secs())
        .unwrap_or(0);
    let location = match app.viewer_location {
        Some(c) => format!("({:.4}, {:.4})", c.lat, c.lng),
        None => "위치 미확인".to_string(),
    };
    format!("{} · {}s · {}", origin, seconds_ago, location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlaceRecord;

    #[test]
    fn star_row_fills_up_to_the_rounded_rating() {
        assert_eq!(star_row(0.0), "☆☆☆☆☆");
        assert_eq!(star_row(2.4), "★★☆☆☆");
        assert_eq!(star_row(2.5), "★★★☆☆");
        assert_eq!(star_row(5.0), "★★★★★");
    }

    #[test]
    fn info_line_skips_empty_segments_and_their_bars() {
        let mut app = App::new("1".to_string());
        app.place = PlaceRecord {
            address: "서울 강남구 테헤란로 101".to_string(),
            ..PlaceRecord::default()
        };
        assert_eq!(info_line(&app), "서울 강남구 테헤란로 101");

        app.place.distance = Some("350m".to_string());
        assert_eq!(info_line(&app), "350m | 서울 강남구 테헤란로 101");

        app.place.industry = Some("카페".to_string());
        assert_eq!(info_line(&app), "350m | 카페 | 서울 강남구 테헤란로 101");
    }
}
