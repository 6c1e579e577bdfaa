use console::Style;
use rawstack_core::frame::Frame;
use rawstack_core::metadata::output_file_name;
use rawstack_core::pipeline::config::StackConfig;
use rawstack_core::pipeline::StackOutput;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_stack_summary(config: &StackConfig, frames: &[Frame]) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Raw Stack"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Directory"),
        s.path.apply_to(config.working_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Operator"),
        s.method.apply_to(config.operator)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Jobs"),
        s.value.apply_to(config.jobs)
    );
    if let Some(reference) = frames.first() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.path.apply_to(output_file_name(
                &reference.stem(),
                frames.len(),
                config.operator
            ))
        );
    }
    println!();

    println!(
        "  {} {}",
        s.header.apply_to("Frames"),
        s.label.apply_to(format!("({})", frames.len()))
    );
    for (i, frame) in frames.iter().enumerate() {
        let marker = if i == 0 { " (reference)" } else { "" };
        println!(
            "    {}. {}{}",
            s.label.apply_to(i + 1),
            s.value.apply_to(frame.source().display()),
            s.label.apply_to(marker)
        );
    }
    println!();
}

pub fn print_stack_result(output: &StackOutput) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Stacked"),
        s.value.apply_to(format!("{} frames ({})", output.frame_count(), output.operator))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Exposure"),
        s.value.apply_to(format!("{} s", output.total_exposure))
    );
    if let Some(ref log) = output.log_file {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Log"),
            s.path.apply_to(log.display())
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.artifact.display())
    );
    println!();
}
