use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use tablescan::extract::find_cells;
use tablescan::{Page, Rect, Ruling, StreamExtractor, TextElement};

fn text_page(rows: usize, cols: usize) -> Page {
    let mut page = Page::new(Rect::new(0.0, 0.0, 612.0, 792.0));
    for row in 0..rows {
        for col in 0..cols {
            let left = 50.0 + col as f64 * 120.0;
            let top = 50.0 + row as f64 * 14.0;
            for (i, ch) in "value".chars().enumerate() {
                page.add_text(TextElement::new(
                    Rect::from_size(left + i as f64 * 6.0, top, 6.0, 10.0),
                    ch.to_string(),
                    "Helvetica",
                    10.0,
                ));
            }
        }
    }
    page
}

fn grid_rulings(rows: usize, cols: usize) -> (Vec<Ruling>, Vec<Ruling>) {
    let h = (0..=rows)
        .map(|r| Ruling::horizontal_at(50.0 + r as f64 * 20.0, 50.0, 50.0 + cols as f64 * 100.0))
        .collect();
    let v = (0..=cols)
        .map(|c| Ruling::vertical_at(50.0 + c as f64 * 100.0, 50.0, 50.0 + rows as f64 * 20.0))
        .collect();
    (h, v)
}

fn bench_stream_extract(c: &mut Criterion) {
    let page = text_page(40, 4);
    let extractor = StreamExtractor::new();
    c.bench_function("stream_extract_40x4", |b| {
        b.iter(|| {
            let tables = extractor.extract(black_box(&page));
            black_box(tables.len())
        })
    });
}

fn bench_find_cells(c: &mut Criterion) {
    let (h, v) = grid_rulings(30, 8);
    c.bench_function("find_cells_30x8", |b| {
        b.iter(|| {
            let cells = find_cells(black_box(&h), black_box(&v));
            black_box(cells.len())
        })
    });
}

criterion_group!(benches, bench_stream_extract, bench_find_cells);
criterion_main!(benches);
