use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pianoroll::editor::{GridLayout, TimelineEditor};
use pianoroll::pitch::PitchTable;
use pianoroll::render::RetainedCanvas;
use pianoroll::sequencer::{EventConverter, Note};

fn notes(count: usize) -> Vec<Note> {
    let table = PitchTable::shared();
    (0..count)
        .map(|i| {
            let name = table.name_for_row(i % table.len()).unwrap_or("C4");
            let start = (i as i64 % 40) * 20;
            Note::new(name, start, start + 40)
        })
        .collect()
}

/// Full redraws with a warm pool (the per-interaction cost)
fn bench_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("redraw");

    for count in [0, 50, 500] {
        let mut editor = TimelineEditor::new(RetainedCanvas::new(), GridLayout::default(), 40);
        editor.replace_notes(notes(count)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| editor.redraw().unwrap());
        });
    }
    group.finish();
}

/// Press-drag-release on an existing note
fn bench_drag_gesture(c: &mut Criterion) {
    c.bench_function("drag_gesture", |b| {
        let mut editor = TimelineEditor::new(RetainedCanvas::new(), GridLayout::default(), 40);
        editor.replace_notes(notes(50)).unwrap();

        // Row 15 holds a note at [300, 340); drag it right and back
        b.iter(|| {
            editor.press(black_box(310.0), black_box(310.0)).unwrap();
            for step in 1..=10 {
                editor.drag(310.0 + step as f32 * 20.0, 310.0).unwrap();
            }
            editor.drag(310.0, 310.0).unwrap();
            editor.release();
        });
    });
}

fn bench_convert(c: &mut Criterion) {
    let notes = notes(1000);
    let converter = EventConverter::default();

    c.bench_function("convert_1000_notes", |b| {
        b.iter(|| black_box(converter.convert(black_box(&notes)).unwrap()));
    });
}

criterion_group!(benches, bench_redraw, bench_drag_gesture, bench_convert);
criterion_main!(benches);
