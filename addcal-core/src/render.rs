/// A widget or block that turns its input into something the host displays.
pub trait Render<Input> {
    type Output;

    fn render(&self, input: Input) -> Self::Output;
}
