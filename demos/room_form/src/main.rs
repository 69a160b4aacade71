use anyhow::{Context, bail};
use headcount_core::timer;
use headcount_rooms::{Allocation, Guest, RoomAllocationForm, RoomAllocationProps};
use headcount_ui::StepControl;
use web_time::Duration;

fn arg(args: &[String], i: usize, default: i64) -> anyhow::Result<i64> {
    match args.get(i) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("argument {i} is not a number: {raw:?}")),
        None => Ok(default),
    }
}

fn print_tree(form: &RoomAllocationForm) {
    for line in form.view().texts() {
        println!("  {line}");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let guest = arg(&args, 1, 10)?;
    let room = arg(&args, 2, 2)?;
    if room < 1 {
        bail!("need at least one room, got {room}");
    }

    let form = RoomAllocationForm::mount(RoomAllocationProps::new(guest, room as usize).on_change(
        |list: &[Allocation]| match serde_json::to_string(list) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("could not encode allocations: {e}"),
        },
    ))?;
    print_tree(&form);

    let ids = form.room_ids();
    let first = ids[0];
    let last = ids[ids.len() - 1];

    log::info!("typing 3 into the first room's adults");
    form.edit_raw(first, Guest::Adult, "3")?;

    log::info!("clicking + on the last room's children");
    form.stepper(last, Guest::Child)?.click(StepControl::Increment);

    log::info!("holding + on the last room's adults for 1.2s");
    let adult = form.stepper(last, Guest::Adult)?;
    adult.pointer_down(StepControl::Increment);
    timer::advance(Duration::from_millis(1200));
    adult.pointer_up(StepControl::Increment);

    log::info!("typing 1 into the first room's children and leaving the field");
    form.edit_raw(first, Guest::Child, "1")?;
    form.stepper(first, Guest::Child)?.focus_lost();

    print_tree(&form);
    form.dispose();
    Ok(())
}
