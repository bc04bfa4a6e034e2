mod supervised;
